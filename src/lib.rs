pub mod api;
pub mod camera;
pub mod error;
pub mod frame;
pub mod marshal;
pub mod native;
pub mod resources;
pub mod schema;
pub mod structs;
mod tables;

// Re-export main types for convenience
pub use crate::api::Fc2Api;
pub use crate::camera::{
    Camera, CameraId, Format7Config, Format7PacketInfo, Format7Settings, Frame, GrabOptions,
    Property, PropertyKind, PropertyUpdate,
};
pub use crate::error::{Error, Result};
pub use crate::frame::{FrameMeta, SampleArray};
pub use crate::marshal::{Arg, BoundFn, CallDesc, Param, PassBy, RetTag, TypeTag};
pub use crate::native::{NativeLibrary, SymbolSource};
pub use crate::resources::{ContextHandle, ResourceManager};
pub use crate::schema::{EnumKey, EnumTable, FieldType, Primitive, SchemaRegistry, StructLayout};
pub use crate::structs::{
    PgrGuid, RawFormat7PacketInfo, RawFormat7Settings, RawImage, RawProperty,
};
