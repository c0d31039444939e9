use crate::engine::errors::ReduceError;
use crate::engine::schema::DataType;
use crate::engine::types::ScalarValue;

/// Physical value array of one column.
///
/// `Int` carries every integer width up to 32 bits (Int8/Int16/Int32); the
/// declared `DataType` on the owning `FieldData` says which one.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarArray {
    Bool(Vec<bool>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<String>),
    Json(Vec<Vec<u8>>),
}

impl ScalarArray {
    pub fn with_capacity(data_type: DataType, capacity: usize) -> Self {
        match data_type {
            DataType::Bool => ScalarArray::Bool(Vec::with_capacity(capacity)),
            DataType::Int8 | DataType::Int16 | DataType::Int32 => {
                ScalarArray::Int(Vec::with_capacity(capacity))
            }
            DataType::Int64 => ScalarArray::Long(Vec::with_capacity(capacity)),
            DataType::Float => ScalarArray::Float(Vec::with_capacity(capacity)),
            DataType::Double => ScalarArray::Double(Vec::with_capacity(capacity)),
            DataType::VarChar => ScalarArray::String(Vec::with_capacity(capacity)),
            DataType::Json => ScalarArray::Json(Vec::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScalarArray::Bool(v) => v.len(),
            ScalarArray::Int(v) => v.len(),
            ScalarArray::Long(v) => v.len(),
            ScalarArray::Float(v) => v.len(),
            ScalarArray::Double(v) => v.len(),
            ScalarArray::String(v) => v.len(),
            ScalarArray::Json(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScalarArray::Bool(_) => "bool",
            ScalarArray::Int(_) => "int",
            ScalarArray::Long(_) => "long",
            ScalarArray::Float(_) => "float",
            ScalarArray::Double(_) => "double",
            ScalarArray::String(_) => "string",
            ScalarArray::Json(_) => "json",
        }
    }

    /// Whether this array variant is the physical carrier of `data_type`.
    pub fn carries(&self, data_type: DataType) -> bool {
        matches!(
            (self, data_type),
            (ScalarArray::Bool(_), DataType::Bool)
                | (
                    ScalarArray::Int(_),
                    DataType::Int8 | DataType::Int16 | DataType::Int32
                )
                | (ScalarArray::Long(_), DataType::Int64)
                | (ScalarArray::Float(_), DataType::Float)
                | (ScalarArray::Double(_), DataType::Double)
                | (ScalarArray::String(_), DataType::VarChar)
                | (ScalarArray::Json(_), DataType::Json)
        )
    }

    /// Appends a cell. `None` stores the type's placeholder; callers track
    /// validity separately.
    pub fn push(&mut self, value: Option<ScalarValue>) -> Result<(), String> {
        match (self, value) {
            (ScalarArray::Bool(v), None) => v.push(false),
            (ScalarArray::Int(v), None) => v.push(0),
            (ScalarArray::Long(v), None) => v.push(0),
            (ScalarArray::Float(v), None) => v.push(0.0),
            (ScalarArray::Double(v), None) => v.push(0.0),
            (ScalarArray::String(v), None) => v.push(String::new()),
            (ScalarArray::Json(v), None) => v.push(Vec::new()),
            (ScalarArray::Bool(v), Some(ScalarValue::Boolean(b))) => v.push(b),
            (ScalarArray::Int(v), Some(ScalarValue::Int32(i))) => v.push(i),
            (ScalarArray::Long(v), Some(ScalarValue::Int64(i))) => v.push(i),
            (ScalarArray::Float(v), Some(ScalarValue::Float32(f))) => v.push(f),
            (ScalarArray::Double(v), Some(ScalarValue::Float64(f))) => v.push(f),
            (ScalarArray::String(v), Some(ScalarValue::Utf8(s))) => v.push(s),
            (arr, Some(other)) => {
                return Err(format!(
                    "cannot store value {} in a {} array",
                    other,
                    arr.kind()
                ));
            }
        }
        Ok(())
    }
}

/// One column of a partial or final aggregation result.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    pub field_id: i64,
    pub field_name: String,
    pub data_type: DataType,
    pub data: ScalarArray,
    /// Per-row validity; `None` means every row is valid.
    pub valid_data: Option<Vec<bool>>,
}

impl FieldData {
    pub fn new(field_id: i64, data_type: DataType, data: ScalarArray) -> Self {
        Self {
            field_id,
            field_name: String::new(),
            data_type,
            data,
            valid_data: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    pub fn with_valid_data(mut self, valid: Vec<bool>) -> Self {
        self.valid_data = Some(valid);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn valid_data(&self) -> Option<&[bool]> {
        self.valid_data.as_deref()
    }

    /// Validity of `row`; rows outside the bitmap are reported invalid.
    #[inline]
    pub fn is_valid(&self, row: usize) -> bool {
        match &self.valid_data {
            Some(valid) => valid.get(row).copied().unwrap_or(false),
            None => true,
        }
    }

    pub fn bool_data(&self) -> Option<&[bool]> {
        match &self.data {
            ScalarArray::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn int_data(&self) -> Option<&[i32]> {
        match &self.data {
            ScalarArray::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn long_data(&self) -> Option<&[i64]> {
        match &self.data {
            ScalarArray::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn float_data(&self) -> Option<&[f32]> {
        match &self.data {
            ScalarArray::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn double_data(&self) -> Option<&[f64]> {
        match &self.data {
            ScalarArray::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn string_data(&self) -> Option<&[String]> {
        match &self.data {
            ScalarArray::String(v) => Some(v),
            _ => None,
        }
    }

    /// Raw integer at `row` widened to i64, ignoring validity.
    #[inline]
    pub fn i64_at(&self, row: usize) -> Option<i64> {
        match &self.data {
            ScalarArray::Int(v) => v.get(row).map(|x| *x as i64),
            ScalarArray::Long(v) => v.get(row).copied(),
            _ => None,
        }
    }

    /// Raw float at `row` widened to f64, ignoring validity.
    #[inline]
    pub fn f64_at(&self, row: usize) -> Option<f64> {
        match &self.data {
            ScalarArray::Float(v) => v.get(row).map(|x| *x as f64),
            ScalarArray::Double(v) => v.get(row).copied(),
            _ => None,
        }
    }

    #[inline]
    pub fn str_at(&self, row: usize) -> Option<&str> {
        match &self.data {
            ScalarArray::String(v) => v.get(row).map(|s| s.as_str()),
            _ => None,
        }
    }

    /// Raw value at `row` in the column's own physical type, ignoring validity.
    pub fn scalar_at(&self, row: usize) -> Option<ScalarValue> {
        match &self.data {
            ScalarArray::Bool(v) => v.get(row).map(|b| ScalarValue::Boolean(*b)),
            ScalarArray::Int(v) => v.get(row).map(|i| ScalarValue::Int32(*i)),
            ScalarArray::Long(v) => v.get(row).map(|i| ScalarValue::Int64(*i)),
            ScalarArray::Float(v) => v.get(row).map(|f| ScalarValue::Float32(*f)),
            ScalarArray::Double(v) => v.get(row).map(|f| ScalarValue::Float64(*f)),
            ScalarArray::String(v) => v.get(row).map(|s| ScalarValue::Utf8(s.clone())),
            ScalarArray::Json(_) => None,
        }
    }

    /// Checks the column against its declared type and the batch row count.
    pub fn check_shape(&self, row_count: usize) -> Result<(), ReduceError> {
        if !self.data.carries(self.data_type) {
            return Err(ReduceError::malformed(
                self.field_id,
                format!(
                    "type tag {} does not match {} array",
                    self.data_type,
                    self.data.kind()
                ),
            ));
        }
        if self.data.len() != row_count {
            return Err(ReduceError::malformed(
                self.field_id,
                format!("expected {} rows, found {}", row_count, self.data.len()),
            ));
        }
        if let Some(valid) = &self.valid_data {
            if valid.len() != row_count {
                return Err(ReduceError::malformed(
                    self.field_id,
                    format!(
                        "validity bitmap has {} entries for {} rows",
                        valid.len(),
                        row_count
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Columnar batch exchanged between shards and the reducer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregationResult {
    fields: Vec<FieldData>,
    row_count: usize,
}

impl AggregationResult {
    pub fn new(fields: Vec<FieldData>, row_count: usize) -> Self {
        Self { fields, row_count }
    }

    pub fn fields(&self) -> &[FieldData] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FieldData> {
        self.fields
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// First column carrying `field_id`.
    pub fn field(&self, field_id: i64) -> Option<&FieldData> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }
}
