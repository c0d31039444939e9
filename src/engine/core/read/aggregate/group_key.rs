use std::hash::{BuildHasher, Hash, Hasher};

use ahash::RandomState as AHashRandomState;

use crate::engine::core::column::FieldData;
use crate::engine::errors::ReduceError;
use crate::engine::schema::{CollectionSchema, DataType};
use crate::engine::types::ScalarValue;

/// One component of a group key.
///
/// `Null` is the single sentinel for an invalid position; it never compares
/// equal to a valid value, whatever placeholder the source stored.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum GroupValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Canonical f64 bit pattern (`-0.0` folded into `0.0`, one NaN)
    Float(u64),
    Str(String),
}

impl GroupValue {
    pub fn from_f64(v: f64) -> Self {
        let canonical = if v == 0.0 {
            0.0f64
        } else if v.is_nan() {
            f64::NAN
        } else {
            v
        };
        GroupValue::Float(canonical.to_bits())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GroupValue::Null)
    }

    /// Converts back to a cell of the slot's declared type; `None` for NULL.
    pub fn to_scalar(&self, data_type: DataType) -> Option<ScalarValue> {
        match self {
            GroupValue::Null => None,
            GroupValue::Bool(b) => Some(ScalarValue::Boolean(*b)),
            GroupValue::Int(i) => match data_type {
                DataType::Int64 => Some(ScalarValue::Int64(*i)),
                _ => Some(ScalarValue::Int32(*i as i32)),
            },
            GroupValue::Float(bits) => {
                let f = f64::from_bits(*bits);
                match data_type {
                    DataType::Float => Some(ScalarValue::Float32(f as f32)),
                    _ => Some(ScalarValue::Float64(f)),
                }
            }
            GroupValue::Str(s) => Some(ScalarValue::Utf8(s.clone())),
        }
    }
}

#[derive(Clone, Debug, Eq)]
pub struct GroupKey {
    // Precomputed 64-bit hash to speed up map lookups
    pub(crate) prehash: u64,
    pub(crate) values: Vec<GroupValue>,
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        // prehash is a cache; equality must be defined by the actual key values
        self.values == other.values
    }
}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prehash.hash(state);
    }
}

impl GroupKey {
    pub fn new(values: Vec<GroupValue>) -> Self {
        let prehash = Self::compute_prehash(&values);
        Self { prehash, values }
    }

    #[inline]
    fn compute_prehash(values: &[GroupValue]) -> u64 {
        let mut hasher = AHashRandomState::with_seeds(0, 0, 0, 0).build_hasher();
        for v in values {
            v.hash(&mut hasher);
        }
        hasher.finish()
    }

    pub fn values(&self) -> &[GroupValue] {
        &self.values
    }

    /// Per-slot validity, in group-by order.
    pub fn validity(&self) -> impl Iterator<Item = bool> + '_ {
        self.values.iter().map(|v| !v.is_null())
    }
}

/// A group-by field resolved against the schema.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyField {
    pub field_id: i64,
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

/// Builds NULL-aware composite keys from the group-by columns of a row.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupKeyCodec {
    fields: Vec<KeyField>,
}

impl GroupKeyCodec {
    pub fn new(group_by: &[i64], schema: &CollectionSchema) -> Result<Self, ReduceError> {
        let mut fields = Vec::with_capacity(group_by.len());
        for field_id in group_by {
            let field = schema.require(*field_id)?;
            if !field.data_type.is_groupable() {
                return Err(ReduceError::UnsupportedType {
                    field_id: field.field_id,
                    data_type: field.data_type,
                });
            }
            fields.push(KeyField {
                field_id: field.field_id,
                name: field.name.clone(),
                data_type: field.data_type,
                nullable: field.nullable,
            });
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encodes `row`; `columns` holds one column per key field, in key order.
    pub fn encode(&self, columns: &[&FieldData], row: usize) -> Result<GroupKey, ReduceError> {
        if columns.len() != self.fields.len() {
            return Err(ReduceError::SchemaMismatch(format!(
                "expected {} group-by columns, got {}",
                self.fields.len(),
                columns.len()
            )));
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for (field, col) in self.fields.iter().zip(columns) {
            // Validity first: the raw slot of a NULL row holds a placeholder.
            if !col.is_valid(row) {
                values.push(GroupValue::Null);
                continue;
            }
            let value = match field.data_type {
                DataType::Bool => col
                    .bool_data()
                    .and_then(|v| v.get(row))
                    .map(|b| GroupValue::Bool(*b)),
                DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
                    col.i64_at(row).map(GroupValue::Int)
                }
                DataType::Float | DataType::Double => col.f64_at(row).map(GroupValue::from_f64),
                DataType::VarChar => col.str_at(row).map(|s| GroupValue::Str(s.to_string())),
                DataType::Json => {
                    return Err(ReduceError::UnsupportedType {
                        field_id: field.field_id,
                        data_type: field.data_type,
                    });
                }
            };
            let value = value.ok_or_else(|| {
                ReduceError::malformed(
                    field.field_id,
                    format!("row {} is missing from {} array", row, col.data.kind()),
                )
            })?;
            values.push(value);
        }

        Ok(GroupKey::new(values))
    }
}
