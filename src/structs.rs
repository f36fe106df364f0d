//! Native FlyCapture2 struct definitions.
//!
//! Hand-written `#[repr(C)]` mirrors of the structs the wrapper passes across
//! the FFI boundary, plus the matching [`StructLayout`] declarations that the
//! schema registry serves to the marshaling layer. The two descriptions of
//! each struct are kept honest by the layout tests at the bottom.

use std::ffi::c_void;
use std::ptr;

use crate::schema::{FieldType, Primitive, StructLayout};

/// Opaque per-camera identifier, resolved once from an index or serial
/// number and reused for every native call addressing that camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgrGuid {
    pub value: [u32; 4],
}

impl PgrGuid {
    pub fn zeroed() -> Self {
        PgrGuid { value: [0; 4] }
    }
}

/// Native image buffer header (`fc2Image`).
///
/// `data_size` is the allocated size; `received_data_size` is how many bytes
/// the last retrieval actually delivered, which is how short/empty frames
/// are detected.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawImage {
    pub rows: i32,
    pub cols: i32,
    pub stride: i32,
    pub data: *mut u8,
    pub data_size: i32,
    pub received_data_size: i32,
    pub format: i32,
    pub bayer_format: i32,
    pub image_impl: *mut c_void,
}

impl RawImage {
    pub fn zeroed() -> Self {
        RawImage {
            rows: 0,
            cols: 0,
            stride: 0,
            data: ptr::null_mut(),
            data_size: 0,
            received_data_size: 0,
            format: 0,
            bayer_format: 0,
            image_impl: ptr::null_mut(),
        }
    }

    /// Pixel format code widened back to the registry's unsigned value.
    ///
    /// The header declares the field as a C int, but the high pixel format
    /// codes (e.g. MONO8 = 0x80000000) overflow into the sign bit.
    pub fn format_code(&self) -> i64 {
        self.format as u32 as i64
    }

    pub fn bayer_code(&self) -> i64 {
        self.bayer_format as u32 as i64
    }
}

/// Native property read/write block (`fc2Property`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawProperty {
    pub prop_type: i32,
    pub present: i32,
    pub abs_control: i32,
    pub one_push: i32,
    pub on_off: i32,
    pub auto_manual_mode: i32,
    pub value_a: u32,
    pub value_b: u32,
    pub abs_value: f32,
    pub reserved: [u32; 8],
}

impl RawProperty {
    pub fn for_type(prop_type: i32) -> Self {
        RawProperty {
            prop_type,
            present: 0,
            abs_control: 0,
            one_push: 0,
            on_off: 0,
            auto_manual_mode: 0,
            value_a: 0,
            value_b: 0,
            abs_value: 0.0,
            reserved: [0; 8],
        }
    }
}

/// Format7 region-of-interest and pixel format selection
/// (`fc2Format7ImageSettings`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFormat7Settings {
    pub mode: i32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub width: u32,
    pub height: u32,
    pub pixel_format: u32,
    pub reserved: [u32; 8],
}

impl RawFormat7Settings {
    pub fn zeroed() -> Self {
        RawFormat7Settings {
            mode: 0,
            offset_x: 0,
            offset_y: 0,
            width: 0,
            height: 0,
            pixel_format: 0,
            reserved: [0; 8],
        }
    }
}

/// Packet size bounds reported by Format7 validation (`fc2Format7PacketInfo`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawFormat7PacketInfo {
    pub recommended_bytes_per_packet: u32,
    pub max_bytes_per_packet: u32,
    pub unit_bytes_per_packet: u32,
    pub reserved: [u32; 8],
}

impl RawFormat7PacketInfo {
    pub fn zeroed() -> Self {
        RawFormat7PacketInfo {
            recommended_bytes_per_packet: 0,
            max_bytes_per_packet: 0,
            unit_bytes_per_packet: 0,
            reserved: [0; 8],
        }
    }
}

/// Layout declarations for the structs above, registered by
/// [`crate::schema::SchemaRegistry::builtin`].
pub(crate) fn builtin_layouts() -> Vec<StructLayout> {
    vec![
        StructLayout::new(
            "fc2PGRGuid",
            [("value", FieldType::Array(Primitive::U32, 4))],
        ),
        StructLayout::new(
            "fc2Image",
            [
                ("rows", FieldType::Primitive(Primitive::I32)),
                ("cols", FieldType::Primitive(Primitive::I32)),
                ("stride", FieldType::Primitive(Primitive::I32)),
                ("pData", FieldType::Primitive(Primitive::Ptr)),
                ("dataSize", FieldType::Primitive(Primitive::I32)),
                ("receivedDataSize", FieldType::Primitive(Primitive::I32)),
                ("format", FieldType::Primitive(Primitive::U32)),
                ("bayerFormat", FieldType::Primitive(Primitive::U32)),
                ("imageImpl", FieldType::Primitive(Primitive::Ptr)),
            ],
        ),
        StructLayout::new(
            "fc2Property",
            [
                ("type", FieldType::Primitive(Primitive::I32)),
                ("present", FieldType::Primitive(Primitive::I32)),
                ("absControl", FieldType::Primitive(Primitive::I32)),
                ("onePush", FieldType::Primitive(Primitive::I32)),
                ("onOff", FieldType::Primitive(Primitive::I32)),
                ("autoManualMode", FieldType::Primitive(Primitive::I32)),
                ("valueA", FieldType::Primitive(Primitive::U32)),
                ("valueB", FieldType::Primitive(Primitive::U32)),
                ("absValue", FieldType::Primitive(Primitive::F32)),
                ("reserved", FieldType::Array(Primitive::U32, 8)),
            ],
        ),
        StructLayout::new(
            "fc2Format7ImageSettings",
            [
                ("mode", FieldType::Primitive(Primitive::I32)),
                ("offsetX", FieldType::Primitive(Primitive::U32)),
                ("offsetY", FieldType::Primitive(Primitive::U32)),
                ("width", FieldType::Primitive(Primitive::U32)),
                ("height", FieldType::Primitive(Primitive::U32)),
                ("pixelFormat", FieldType::Primitive(Primitive::U32)),
                ("reserved", FieldType::Array(Primitive::U32, 8)),
            ],
        ),
        StructLayout::new(
            "fc2Format7PacketInfo",
            [
                ("recommendedBytesPerPacket", FieldType::Primitive(Primitive::U32)),
                ("maxBytesPerPacket", FieldType::Primitive(Primitive::U32)),
                ("unitBytesPerPacket", FieldType::Primitive(Primitive::U32)),
                ("reserved", FieldType::Array(Primitive::U32, 8)),
            ],
        ),
    ]
}
