use crate::engine::core::column::{FieldData, ScalarArray};
use crate::engine::schema::DataType;

pub struct FieldDataFactory {
    field_id: i64,
    name: String,
    data_type: DataType,
    data: ScalarArray,
    valid: Option<Vec<bool>>,
}

impl FieldDataFactory {
    fn with_array(field_id: i64, data_type: DataType, data: ScalarArray) -> Self {
        Self {
            field_id,
            name: String::new(),
            data_type,
            data,
            valid: None,
        }
    }

    pub fn strings(field_id: i64, values: &[&str]) -> Self {
        Self::with_array(
            field_id,
            DataType::VarChar,
            ScalarArray::String(values.iter().map(|s| s.to_string()).collect()),
        )
    }

    pub fn longs(field_id: i64, values: &[i64]) -> Self {
        Self::with_array(field_id, DataType::Int64, ScalarArray::Long(values.to_vec()))
    }

    pub fn ints(field_id: i64, values: &[i32]) -> Self {
        Self::with_array(field_id, DataType::Int32, ScalarArray::Int(values.to_vec()))
    }

    pub fn doubles(field_id: i64, values: &[f64]) -> Self {
        Self::with_array(field_id, DataType::Double, ScalarArray::Double(values.to_vec()))
    }

    pub fn floats(field_id: i64, values: &[f32]) -> Self {
        Self::with_array(field_id, DataType::Float, ScalarArray::Float(values.to_vec()))
    }

    pub fn bools(field_id: i64, values: &[bool]) -> Self {
        Self::with_array(field_id, DataType::Bool, ScalarArray::Bool(values.to_vec()))
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Overrides the declared type tag without touching the array.
    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_validity(mut self, valid: &[bool]) -> Self {
        self.valid = Some(valid.to_vec());
        self
    }

    pub fn create(self) -> FieldData {
        let mut field = FieldData::new(self.field_id, self.data_type, self.data).with_name(self.name);
        if let Some(valid) = self.valid {
            field = field.with_valid_data(valid);
        }
        field
    }
}
