//! Schema registry: named enumerations and native struct layouts.
//!
//! The registry is the data-driven half of the binding layer. It is built
//! once at startup (from the built-in FlyCapture2 tables and optionally from
//! JSON supplied at configuration time), is read-only afterwards, and is safe
//! to share across threads behind an `Arc`.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::tables;

/// A key into an enumeration: either the symbolic name or the integer code.
///
/// This is the closed replacement for the original's "string or int accepted
/// anywhere" convention; callers pick a side explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumKey {
    Name(String),
    Code(i64),
}

impl From<&str> for EnumKey {
    fn from(name: &str) -> Self {
        EnumKey::Name(name.to_string())
    }
}

impl From<i64> for EnumKey {
    fn from(code: i64) -> Self {
        EnumKey::Code(code)
    }
}

/// A bidirectional name <-> code mapping.
///
/// Construction enforces that the mapping is injective both ways; lookups for
/// absent keys fail with [`Error::UnknownKey`] rather than defaulting.
#[derive(Debug, Clone)]
pub struct EnumTable {
    name: String,
    by_name: HashMap<String, i64>,
    by_code: HashMap<i64, String>,
}

impl EnumTable {
    pub fn new<N, I, S>(name: N, pairs: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let name = name.into();
        let mut by_name = HashMap::new();
        let mut by_code = HashMap::new();
        for (key, code) in pairs {
            let key = key.into();
            if by_name.contains_key(&key) {
                return Err(Error::DuplicateKey {
                    table: name,
                    key,
                });
            }
            if let Some(taken) = by_code.get(&code) {
                return Err(Error::DuplicateKey {
                    table: name,
                    key: format!("{} (code {} already mapped to {})", key, code, taken),
                });
            }
            by_name.insert(key.clone(), code);
            by_code.insert(code, key);
        }
        Ok(EnumTable {
            name,
            by_name,
            by_code,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Resolves a symbolic name to its code.
    pub fn code(&self, key: &str) -> Result<i64> {
        self.by_name.get(key).copied().ok_or_else(|| Error::UnknownKey {
            table: self.name.clone(),
            key: key.to_string(),
        })
    }

    /// Resolves a code to its symbolic name.
    pub fn symbol(&self, code: i64) -> Result<&str> {
        self.by_code
            .get(&code)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownKey {
                table: self.name.clone(),
                key: code.to_string(),
            })
    }

    /// Maps a key to its counterpart on the other side of the table.
    pub fn lookup(&self, key: &EnumKey) -> Result<EnumKey> {
        match key {
            EnumKey::Name(name) => Ok(EnumKey::Code(self.code(name)?)),
            EnumKey::Code(code) => Ok(EnumKey::Name(self.symbol(*code)?.to_string())),
        }
    }

    /// Iterates over every (name, code) pair in the table.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.by_name.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Fixed-width primitive field types understood by the marshaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    U8,
    I32,
    U32,
    F32,
    /// Pointer-sized field (native handles, data pointers).
    Ptr,
}

impl Primitive {
    pub fn size(self) -> usize {
        match self {
            Primitive::U8 => 1,
            Primitive::I32 | Primitive::U32 | Primitive::F32 => 4,
            Primitive::Ptr => std::mem::size_of::<usize>(),
        }
    }

    pub fn align(self) -> usize {
        self.size()
    }
}

/// The type of one struct field: primitive, fixed-length array, or nested struct.
#[derive(Debug, Clone)]
pub enum FieldType {
    Primitive(Primitive),
    Array(Primitive, usize),
    Nested(StructLayout),
}

impl FieldType {
    fn size(&self) -> usize {
        match self {
            FieldType::Primitive(p) => p.size(),
            FieldType::Array(p, len) => p.size() * len,
            FieldType::Nested(layout) => layout.size(),
        }
    }

    fn align(&self) -> usize {
        match self {
            FieldType::Primitive(p) | FieldType::Array(p, _) => p.align(),
            FieldType::Nested(layout) => layout.align(),
        }
    }
}

/// An ordered field list describing the C ABI layout of a native struct.
///
/// Immutable once declared. Sizes and offsets follow the standard C layout
/// rules (each field aligned to its own alignment, total size rounded up to
/// the struct alignment), which is what the `#[repr(C)]` definitions in
/// [`crate::structs`] produce; the agreement is unit-tested there.
#[derive(Debug, Clone)]
pub struct StructLayout {
    name: String,
    fields: Vec<(String, FieldType)>,
}

impl StructLayout {
    pub fn new<N, I, S>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        StructLayout {
            name: name.into(),
            fields: fields.into_iter().map(|(n, t)| (n.into(), t)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn align(&self) -> usize {
        self.fields.iter().map(|(_, t)| t.align()).max().unwrap_or(1)
    }

    pub fn size(&self) -> usize {
        let mut offset = 0;
        for (_, ty) in &self.fields {
            offset = align_up(offset, ty.align());
            offset += ty.size();
        }
        align_up(offset, self.align())
    }

    /// Byte offset of a named field.
    pub fn offset_of(&self, field: &str) -> Result<usize> {
        let mut offset = 0;
        for (name, ty) in &self.fields {
            offset = align_up(offset, ty.align());
            if name == field {
                return Ok(offset);
            }
            offset += ty.size();
        }
        Err(Error::UnknownKey {
            table: self.name.clone(),
            key: field.to_string(),
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(n, t)| (n.as_str(), t))
    }
}

fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) / align * align
}

/// Process-wide, read-only registry of enumerations and struct layouts.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    enums: HashMap<String, EnumTable>,
    structs: HashMap<String, StructLayout>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a registry preloaded with the FlyCapture2 tables the wrapper
    /// drives: error codes, property types, pixel formats, bayer tiles,
    /// frame rates and video modes, plus the layouts of the native structs
    /// in [`crate::structs`].
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let built_in: &[(&str, &[(&str, i64)])] = &[
            ("fc2Error", tables::ERROR_CODES),
            ("fc2PropertyType", tables::PROPERTY_TYPES),
            ("fc2FrameRate", tables::FRAME_RATES),
            ("fc2VideoMode", tables::VIDEO_MODES),
            ("fc2PixelFormat", tables::PIXEL_FORMATS),
            ("fc2BayerTileFormat", tables::BAYER_TILE_FORMATS),
        ];
        for (name, pairs) in built_in {
            let table = EnumTable::new(*name, pairs.iter().map(|(k, v)| (*k, *v)))
                .unwrap_or_else(|e| panic!("built-in table {} is not bijective: {}", name, e));
            registry
                .register_enum(table)
                .unwrap_or_else(|e| panic!("built-in table {} registered twice: {}", name, e));
        }
        for layout in crate::structs::builtin_layouts() {
            registry
                .register_struct(layout)
                .unwrap_or_else(|e| panic!("built-in layout registered twice: {}", e));
        }
        registry
    }

    /// Registers the enumerations found in a JSON document of the form
    /// `{ "tableName": { "SYMBOL": code, ... }, ... }`.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let parsed: BTreeMap<String, BTreeMap<String, i64>> =
            serde_json::from_str(json).map_err(Error::SchemaParse)?;
        for (name, pairs) in parsed {
            self.register_enum(EnumTable::new(name, pairs)?)?;
        }
        Ok(())
    }

    pub fn register_enum(&mut self, table: EnumTable) -> Result<()> {
        if self.enums.contains_key(table.name()) {
            return Err(Error::DuplicateKey {
                table: "registry".to_string(),
                key: table.name().to_string(),
            });
        }
        self.enums.insert(table.name().to_string(), table);
        Ok(())
    }

    pub fn register_struct(&mut self, layout: StructLayout) -> Result<()> {
        if self.structs.contains_key(layout.name()) {
            return Err(Error::DuplicateKey {
                table: "registry".to_string(),
                key: layout.name().to_string(),
            });
        }
        self.structs.insert(layout.name().to_string(), layout);
        Ok(())
    }

    pub fn enum_table(&self, name: &str) -> Result<&EnumTable> {
        self.enums.get(name).ok_or_else(|| Error::UnknownKey {
            table: "registry".to_string(),
            key: name.to_string(),
        })
    }

    pub fn struct_layout(&self, name: &str) -> Result<&StructLayout> {
        self.structs.get(name).ok_or_else(|| Error::UnknownKey {
            table: "registry".to_string(),
            key: name.to_string(),
        })
    }

    /// Convenience: name -> code in a named table.
    pub fn code_of(&self, table: &str, name: &str) -> Result<i64> {
        self.enum_table(table)?.code(name)
    }

    /// Convenience: code -> name in a named table.
    pub fn name_of(&self, table: &str, code: i64) -> Result<&str> {
        self.enum_table(table)?.symbol(code)
    }
}
