//! Field-table emission from `#[derive(Record)]`.

use bijective::{FieldKind, Record, Value};

#[derive(Record, Debug, PartialEq)]
struct Person {
    name: String,
    #[record(rename = "yearsAlive", alias = "age", alias = "years_alive")]
    years: u32,
    nickname: Option<String>,
    #[record(optional)]
    tags: Vec<String>,
}

#[test]
fn shape_describes_the_declaration() {
    bijective_testhelpers::setup();

    let shape = Person::SHAPE;
    assert_eq!(shape.type_name, "Person");
    assert_eq!(shape.field_count(), 4);

    let names: Vec<&str> = shape.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["name", "years", "nickname", "tags"]);

    let years = &shape.fields[1];
    assert_eq!(years.wire_name, "yearsAlive");
    assert_eq!(years.aliases, ["age", "years_alive"]);
    assert!(!years.nullable);
    assert_eq!(years.ctor_position, 1);
    assert_eq!(years.kind, FieldKind::Scalar);

    assert!(shape.fields[2].nullable);
    assert!(shape.fields[3].nullable);
    assert_eq!(shape.fields[3].kind, FieldKind::Sequence);
}

#[test]
fn derived_shapes_pass_validation() {
    bijective_testhelpers::setup();
    assert!(Person::SHAPE.validate().is_ok());
}

#[test]
fn key_resolution_uses_wire_names_and_aliases() {
    bijective_testhelpers::setup();

    let shape = Person::SHAPE;
    assert_eq!(shape.field_by_key("age").map(|f| f.name), Some("years"));
    assert_eq!(shape.field_by_key("yearsAlive").map(|f| f.name), Some("years"));
    assert!(shape.field_by_key("years").is_none());
}

#[test]
fn read_field_follows_declaration_order() {
    bijective_testhelpers::setup();

    let person = Person {
        name: "Ada".to_owned(),
        years: 36,
        nickname: None,
        tags: vec!["math".to_owned()],
    };
    assert_eq!(person.read_field(0), Value::from("Ada"));
    assert_eq!(person.read_field(1), Value::from(36u32));
    assert_eq!(person.read_field(2), Value::Null);
    assert_eq!(person.read_field(4), Value::Null);
}
