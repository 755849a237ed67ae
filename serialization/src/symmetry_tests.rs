use super::*;
use cbor::encode::emit_map;
use rust_decimal::Decimal;
use test_models::*;
use time::{
    Duration,
    macros::{date, datetime, time},
};
use uuid::Uuid;

fn round_trip(entity: &TestEntity) -> TestEntity {
    let mut writer = CborSerializationWriterFactory
        .serialization_writer(CBOR_CONTENT_TYPE)
        .unwrap();
    writer.write_object_value("", Some(entity), &[]).unwrap();
    let data = writer.get_serialized_content().unwrap();

    CborParseNodeFactory::default()
        .root_parse_node(CBOR_CONTENT_TYPE, data.as_slice())
        .unwrap()
        .get_object_value(TestEntity::create_from_discriminator)
        .unwrap()
}

#[test]
fn phones() {
    let entity = TestEntity {
        id: Some("abc".to_string()),
        business_phones: Some(vec!["+1 555".to_string()]),
        ..Default::default()
    };
    assert_eq!(round_trip(&entity), entity);
}

#[test]
fn full_entity() {
    let mut entity = TestEntity {
        id: Some("48d31887-5fad-4d73-a9f5-3c356e68a038".to_string()),
        office_location: Some(String::new()),
        numbers: Some(TestEnum::ONE | TestEnum::THREE),
        test_naming_enum: Some(TestNamingEnum::Item2SubItem1),
        work_duration: Some(Duration::hours(1) + Duration::milliseconds(500)),
        birth_day: Some(date!(2017 - 09 - 04)),
        start_work_time: Some(time!(08:00:00)),
        end_work_time: Some(time!(17:30:00.125)),
        created_date_time: Some(datetime!(2023-01-01 12:30:00 +02:00)),
        business_phones: Some(Vec::new()),
        manager: Some(Box::new(TestEntity {
            id: Some("2fe22fe5-1132-42cf-90f9-1dc17e325a74".to_string()),
            ..Default::default()
        })),
        ..Default::default()
    };
    for (key, value) in [
        ("jobTitle", AdditionalValue::from("Author")),
        ("accountEnabled", AdditionalValue::Bool(true)),
        ("count", AdditionalValue::UInt64(u64::MAX)),
        ("offset", AdditionalValue::Long(-3)),
        ("ratio", AdditionalValue::Double(0.5)),
        ("scale", AdditionalValue::Float(0.25)),
        ("price", AdditionalValue::Decimal(Decimal::new(-1999, 2))),
        (
            "userId",
            AdditionalValue::Guid(Uuid::from_u128(0x48d318875fad4d73a9f53c356e68a038)),
        ),
        (
            "lastSeen",
            AdditionalValue::DateTimeOffset(datetime!(2024-02-29 23:59:59 UTC)),
        ),
        (
            "tags",
            AdditionalValue::from(vec![AdditionalValue::from("a"), AdditionalValue::Null]),
        ),
    ] {
        entity.additional_data.insert(key.to_string(), value);
    }

    assert_eq!(round_trip(&entity), entity);
}

#[test]
fn null_and_absent() {
    let data = emit_map(Some(2), |m| {
        m.emit("id");
        m.emit("1");
        m.emit("officeLocation");
        m.emit_null();
    });
    let entity = ParseNode::new(&data)
        .unwrap()
        .get_object_value(TestEntity::create_from_discriminator)
        .unwrap();
    assert_eq!(entity.office_location, None);
    assert!(entity.additional_data.is_empty());

    let mut writer = SerializationWriter::new();
    writer
        .write_object_value("", Some(&entity), &[])
        .unwrap();
    assert_eq!(
        writer.get_serialized_content().unwrap(),
        emit_map(Some(1), |m| {
            m.emit("id");
            m.emit("1");
        })
    );
}

#[test]
fn scalars() {
    fn check<T>(value: T)
    where
        T: PrimitiveValue + PartialEq + std::fmt::Debug,
    {
        let mut writer = SerializationWriter::new();
        value.write_value(&mut writer).unwrap();
        let data = writer.get_serialized_content().unwrap();
        let node = ParseNode::new(&data).unwrap();
        assert_eq!(T::from_parse_node(&node), Some(value));
    }

    check(true);
    check(u8::MAX);
    check(i8::MIN);
    check(i32::MIN);
    check(i64::MAX);
    check(f32::MIN_POSITIVE);
    check(f64::MAX);
    check(Decimal::new(i64::MIN, 28));
    check(Uuid::from_u128(1));
    check(datetime!(1970-01-01 00:00:00.000000001 -05:30));
    check(Duration::new(-86_400 * 3, -5));
    check(date!(0001 - 01 - 01));
    check(time!(23:59:59.999999999));
    check(String::new());
    check("2023-01-01T00:00:00Z".to_string());
}

#[test]
fn parse_node_factory() {
    let factory = CborParseNodeFactory::new(Config::default());
    assert_eq!(factory.valid_content_type(), "application/cbor");

    let node = factory
        .root_parse_node("APPLICATION/CBOR", &[0x01u8][..])
        .unwrap();
    assert_eq!(node.get_int_value(), Some(1));

    assert!(matches!(
        factory.root_parse_node("", &[0x01u8][..]),
        Err(Error::MissingContentType)
    ));
    assert!(matches!(
        factory.root_parse_node("application/json", &[0x01u8][..]),
        Err(Error::InvalidContentType { found, .. }) if found == "application/json"
    ));

    struct Broken;
    impl std::io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("broken stream"))
        }
    }
    assert!(matches!(
        factory.root_parse_node(CBOR_CONTENT_TYPE, Broken),
        Err(Error::Io(_))
    ));
}
