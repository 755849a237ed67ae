use super::*;
use time::{Date, Duration, OffsetDateTime, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestEnum(u64);

impl TestEnum {
    pub const ONE: Self = Self(0x1);
    pub const TWO: Self = Self(0x2);
    pub const THREE: Self = Self(0x4);
}

impl std::ops::BitOr for TestEnum {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl EnumValue for TestEnum {
    const FLAGS: bool = true;

    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<TestEnum>] = &[
            Member::new("One", TestEnum::ONE),
            Member::new("Two", TestEnum::TWO),
            Member::new("Three", TestEnum::THREE),
        ];
        MEMBERS
    }

    fn to_bits(self) -> u64 {
        self.0
    }

    fn from_bits(bits: u64) -> Option<Self> {
        Some(Self(bits))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestNamingEnum {
    Item1,
    Item2SubItem1,
    Item3SubItem1,
}

impl EnumValue for TestNamingEnum {
    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<TestNamingEnum>] = &[
            Member::new("Item1", TestNamingEnum::Item1),
            Member::renamed("Item2SubItem1", "Item2:SubItem1", TestNamingEnum::Item2SubItem1),
            Member::renamed("Item3SubItem1", "Item3:SubItem1", TestNamingEnum::Item3SubItem1),
        ];
        MEMBERS
    }

    fn to_bits(self) -> u64 {
        self as u64
    }

    fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(Self::Item1),
            1 => Some(Self::Item2SubItem1),
            2 => Some(Self::Item3SubItem1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestEntity {
    pub id: Option<String>,
    pub office_location: Option<String>,
    pub numbers: Option<TestEnum>,
    pub test_naming_enum: Option<TestNamingEnum>,
    pub work_duration: Option<Duration>,
    pub birth_day: Option<Date>,
    pub start_work_time: Option<Time>,
    pub end_work_time: Option<Time>,
    pub created_date_time: Option<OffsetDateTime>,
    pub business_phones: Option<Vec<String>>,
    pub manager: Option<Box<TestEntity>>,
    pub additional_data: AdditionalData,
}

impl TestEntity {
    pub fn create_from_discriminator(_node: &ParseNode) -> Result<Self, Error> {
        Ok(Self::default())
    }
}

impl Parsable for TestEntity {
    fn field_deserializers(&self) -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                "id",
                field(|e: &mut Self, n| {
                    e.id = n.get_string_value();
                    Ok(())
                }),
            ),
            (
                "officeLocation",
                field(|e: &mut Self, n| {
                    e.office_location = n.get_string_value();
                    Ok(())
                }),
            ),
            (
                "numbers",
                field(|e: &mut Self, n| {
                    e.numbers = n.get_enum_value();
                    Ok(())
                }),
            ),
            (
                "testNamingEnum",
                field(|e: &mut Self, n| {
                    e.test_naming_enum = n.get_enum_value();
                    Ok(())
                }),
            ),
            (
                "workDuration",
                field(|e: &mut Self, n| {
                    e.work_duration = n.get_time_span_value();
                    Ok(())
                }),
            ),
            (
                "birthDay",
                field(|e: &mut Self, n| {
                    e.birth_day = n.get_date_value();
                    Ok(())
                }),
            ),
            (
                "startWorkTime",
                field(|e: &mut Self, n| {
                    e.start_work_time = n.get_time_value();
                    Ok(())
                }),
            ),
            (
                "endWorkTime",
                field(|e: &mut Self, n| {
                    e.end_work_time = n.get_time_value();
                    Ok(())
                }),
            ),
            (
                "createdDateTime",
                field(|e: &mut Self, n| {
                    e.created_date_time = n.get_date_time_offset_value();
                    Ok(())
                }),
            ),
            (
                "businessPhones",
                field(|e: &mut Self, n| {
                    e.business_phones = Some(
                        n.get_collection_of_primitive_values::<String>()
                            .flatten()
                            .collect(),
                    );
                    Ok(())
                }),
            ),
            (
                "manager",
                field(|e: &mut Self, n| {
                    e.manager = Some(Box::new(
                        n.get_object_value(TestEntity::create_from_discriminator)?,
                    ));
                    Ok(())
                }),
            ),
        ])
    }

    fn serialize(&self, writer: &mut SerializationWriter) -> Result<(), Error> {
        writer.write_string_value("id", self.id.as_deref())?;
        writer.write_string_value("officeLocation", self.office_location.as_deref())?;
        writer.write_enum_value("numbers", self.numbers)?;
        writer.write_enum_value("testNamingEnum", self.test_naming_enum)?;
        writer.write_time_span_value("workDuration", self.work_duration)?;
        writer.write_date_value("birthDay", self.birth_day)?;
        writer.write_time_value("startWorkTime", self.start_work_time)?;
        writer.write_time_value("endWorkTime", self.end_work_time)?;
        writer.write_date_time_offset_value("createdDateTime", self.created_date_time)?;
        writer.write_collection_of_primitive_values("businessPhones", self.business_phones.as_deref())?;
        writer.write_object_value("manager", self.manager.as_deref(), &[])?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> Option<&AdditionalData> {
        Some(&self.additional_data)
    }

    fn additional_data_mut(&mut self) -> Option<&mut AdditionalData> {
        Some(&mut self.additional_data)
    }
}

/// No additional data bag: unknown fields are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondTestEntity {
    pub display_name: Option<String>,
    pub id: Option<i64>,
    pub office_location: Option<String>,
}

impl SecondTestEntity {
    pub fn create_from_discriminator(_node: &ParseNode) -> Result<Self, Error> {
        Ok(Self::default())
    }
}

impl Parsable for SecondTestEntity {
    fn field_deserializers(&self) -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                "displayName",
                field(|e: &mut Self, n| {
                    e.display_name = n.get_string_value();
                    Ok(())
                }),
            ),
            (
                "id",
                field(|e: &mut Self, n| {
                    e.id = n.get_long_value();
                    Ok(())
                }),
            ),
            (
                "officeLocation",
                field(|e: &mut Self, n| {
                    e.office_location = n.get_string_value();
                    Ok(())
                }),
            ),
        ])
    }

    fn serialize(&self, writer: &mut SerializationWriter) -> Result<(), Error> {
        writer.write_string_value("displayName", self.display_name.as_deref())?;
        writer.write_long_value("id", self.id)?;
        writer.write_string_value("officeLocation", self.office_location.as_deref())
    }
}

/// One of: a test entity, a second test entity, a list of test entities or a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionTypeMock {
    pub composed_type1: Option<TestEntity>,
    pub composed_type2: Option<SecondTestEntity>,
    pub composed_type3: Option<Vec<TestEntity>>,
    pub string_value: Option<String>,
}

impl UnionTypeMock {
    pub fn create_from_discriminator(node: &ParseNode) -> Result<Self, Error> {
        let mut result = Self::default();
        let mapping = node
            .get_child_node("@type")?
            .and_then(|n| n.get_string_value());
        match mapping.as_deref() {
            Some("#test.testEntity") => result.composed_type1 = Some(TestEntity::default()),
            Some("#test.secondTestEntity") => {
                result.composed_type2 = Some(SecondTestEntity::default())
            }
            _ => {
                if let Some(s) = node.get_string_value() {
                    result.string_value = Some(s);
                } else {
                    let items = node
                        .get_collection_of_object_values(TestEntity::create_from_discriminator)
                        .collect::<Result<Vec<_>, _>>()?;
                    if !items.is_empty() {
                        result.composed_type3 = Some(items);
                    }
                }
            }
        }
        Ok(result)
    }
}

impl Parsable for UnionTypeMock {
    fn field_deserializers(&self) -> FieldDeserializers<Self> {
        if let Some(c) = &self.composed_type1 {
            project_deserializers(c.field_deserializers(), |u: &mut Self| u.composed_type1.as_mut())
        } else if let Some(c) = &self.composed_type2 {
            project_deserializers(c.field_deserializers(), |u: &mut Self| u.composed_type2.as_mut())
        } else {
            FieldDeserializers::new()
        }
    }

    fn serialize(&self, writer: &mut SerializationWriter) -> Result<(), Error> {
        if let Some(c) = &self.composed_type1 {
            writer.write_object_value("", Some(c), &[])
        } else if let Some(c) = &self.composed_type2 {
            writer.write_object_value("", Some(c), &[])
        } else if let Some(s) = &self.string_value {
            writer.write_string_value("", Some(s))
        } else if let Some(c) = &self.composed_type3 {
            writer.write_collection_of_object_values("", Some(c))
        } else {
            Ok(())
        }
    }

    fn is_composed_type_wrapper(&self) -> bool {
        true
    }
}

/// All of: a test entity and a second test entity, or a list of test entities, or a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionTypeMock {
    pub composed_type1: Option<TestEntity>,
    pub composed_type2: Option<SecondTestEntity>,
    pub composed_type3: Option<Vec<TestEntity>>,
    pub string_value: Option<String>,
}

impl IntersectionTypeMock {
    pub fn create_from_discriminator(node: &ParseNode) -> Result<Self, Error> {
        let mut result = Self::default();
        if let Some(s) = node.get_string_value() {
            result.string_value = Some(s);
            return Ok(result);
        }
        let items = node
            .get_collection_of_object_values(TestEntity::create_from_discriminator)
            .collect::<Result<Vec<_>, _>>()?;
        if !items.is_empty() {
            result.composed_type3 = Some(items);
        } else {
            result.composed_type1 = Some(TestEntity::default());
            result.composed_type2 = Some(SecondTestEntity::default());
        }
        Ok(result)
    }
}

impl Parsable for IntersectionTypeMock {
    fn field_deserializers(&self) -> FieldDeserializers<Self> {
        let mut tables = Vec::new();
        if let Some(c) = &self.composed_type1 {
            tables.push(project_deserializers(c.field_deserializers(), |u: &mut Self| {
                u.composed_type1.as_mut()
            }));
        }
        if let Some(c) = &self.composed_type2 {
            tables.push(project_deserializers(c.field_deserializers(), |u: &mut Self| {
                u.composed_type2.as_mut()
            }));
        }
        merge_deserializers(tables)
    }

    fn serialize(&self, writer: &mut SerializationWriter) -> Result<(), Error> {
        if let Some(s) = &self.string_value {
            writer.write_string_value("", Some(s))
        } else if let Some(c) = &self.composed_type3 {
            writer.write_collection_of_object_values("", Some(c))
        } else {
            let merged = self
                .composed_type2
                .iter()
                .map(|c| c as &dyn Parsable)
                .collect::<Vec<_>>();
            writer.write_object_value("", self.composed_type1.as_ref(), &merged)
        }
    }

    fn is_composed_type_wrapper(&self) -> bool {
        true
    }
}
