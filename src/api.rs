//! The bound FlyCapture2 C API.
//!
//! One [`CallDesc`] per entry point the wrapper drives, bound eagerly when
//! [`Fc2Api::bind`] runs so that a missing or renamed symbol fails at startup
//! instead of mid-capture. [`Fc2Api::call`] is the single chokepoint that
//! turns a nonzero `fc2Error` status into [`Error::NativeCall`], with the
//! symbolic error name resolved through the schema registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::marshal::{Arg, BoundFn, CallDesc, Param, PassBy, RetTag, TypeTag};
use crate::native::SymbolSource;
use crate::schema::SchemaRegistry;

pub const CREATE_CONTEXT: &str = "fc2CreateContext";
pub const DESTROY_CONTEXT: &str = "fc2DestroyContext";
pub const GET_NUM_OF_CAMERAS: &str = "fc2GetNumOfCameras";
pub const GET_NUM_OF_DEVICES: &str = "fc2GetNumOfDevices";
pub const GET_CAMERA_SERIAL_NUMBER_FROM_INDEX: &str = "fc2GetCameraSerialNumberFromIndex";
pub const GET_CAMERA_FROM_INDEX: &str = "fc2GetCameraFromIndex";
pub const GET_CAMERA_FROM_SERIAL_NUMBER: &str = "fc2GetCameraFromSerialNumber";
pub const CONNECT: &str = "fc2Connect";
pub const DISCONNECT: &str = "fc2Disconnect";
pub const START_CAPTURE: &str = "fc2StartCapture";
pub const STOP_CAPTURE: &str = "fc2StopCapture";
pub const CREATE_IMAGE: &str = "fc2CreateImage";
pub const DESTROY_IMAGE: &str = "fc2DestroyImage";
pub const RETRIEVE_BUFFER: &str = "fc2RetrieveBuffer";
pub const CONVERT_IMAGE_TO: &str = "fc2ConvertImageTo";
pub const GET_PROPERTY: &str = "fc2GetProperty";
pub const SET_PROPERTY: &str = "fc2SetProperty";
pub const GET_VIDEO_MODE_AND_FRAME_RATE: &str = "fc2GetVideoModeAndFrameRate";
pub const GET_VIDEO_MODE_AND_FRAME_RATE_INFO: &str = "fc2GetVideoModeAndFrameRateInfo";
pub const SET_VIDEO_MODE_AND_FRAME_RATE: &str = "fc2SetVideoModeAndFrameRate";
pub const GET_FORMAT7_CONFIGURATION: &str = "fc2GetFormat7Configuration";
pub const VALIDATE_FORMAT7_SETTINGS: &str = "fc2ValidateFormat7Settings";
pub const SET_FORMAT7_CONFIGURATION: &str = "fc2SetFormat7Configuration";

const fn p(name: &'static str, tag: TypeTag, pass: PassBy) -> Param {
    Param { name, tag, pass }
}

/// Descriptors for every entry point bound by [`Fc2Api::bind`].
///
/// Contexts are opaque handles passed by value; structs are always passed
/// through a caller-owned `#[repr(C)]` cell.
pub const DESCRIPTORS: &[CallDesc] = &[
    CallDesc {
        symbol: CREATE_CONTEXT,
        ret: RetTag::Status,
        params: &[p("pContext", TypeTag::Ptr, PassBy::Ref)],
    },
    CallDesc {
        symbol: DESTROY_CONTEXT,
        ret: RetTag::Status,
        params: &[p("context", TypeTag::Ptr, PassBy::Value)],
    },
    CallDesc {
        symbol: GET_NUM_OF_CAMERAS,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pNumCameras", TypeTag::U32, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: GET_NUM_OF_DEVICES,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pNumDevices", TypeTag::U32, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: GET_CAMERA_SERIAL_NUMBER_FROM_INDEX,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("index", TypeTag::U32, PassBy::Value),
            p("pSerialNumber", TypeTag::U32, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: GET_CAMERA_FROM_INDEX,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("index", TypeTag::U32, PassBy::Value),
            p("pGuid", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: GET_CAMERA_FROM_SERIAL_NUMBER,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("serialNumber", TypeTag::U32, PassBy::Value),
            p("pGuid", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: CONNECT,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pGuid", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: DISCONNECT,
        ret: RetTag::Status,
        params: &[p("context", TypeTag::Ptr, PassBy::Value)],
    },
    CallDesc {
        symbol: START_CAPTURE,
        ret: RetTag::Status,
        params: &[p("context", TypeTag::Ptr, PassBy::Value)],
    },
    CallDesc {
        symbol: STOP_CAPTURE,
        ret: RetTag::Status,
        params: &[p("context", TypeTag::Ptr, PassBy::Value)],
    },
    CallDesc {
        symbol: CREATE_IMAGE,
        ret: RetTag::Status,
        params: &[p("pImage", TypeTag::Struct, PassBy::Ref)],
    },
    CallDesc {
        symbol: DESTROY_IMAGE,
        ret: RetTag::Status,
        params: &[p("pImage", TypeTag::Struct, PassBy::Ref)],
    },
    CallDesc {
        symbol: RETRIEVE_BUFFER,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pImage", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: CONVERT_IMAGE_TO,
        ret: RetTag::Status,
        params: &[
            p("format", TypeTag::U32, PassBy::Value),
            p("pImageIn", TypeTag::Struct, PassBy::Ref),
            p("pImageOut", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: GET_PROPERTY,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pProp", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: SET_PROPERTY,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pProp", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: GET_VIDEO_MODE_AND_FRAME_RATE,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pVideoMode", TypeTag::U32, PassBy::Ref),
            p("pFrameRate", TypeTag::U32, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: GET_VIDEO_MODE_AND_FRAME_RATE_INFO,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("videoMode", TypeTag::U32, PassBy::Value),
            p("frameRate", TypeTag::U32, PassBy::Value),
            p("pSupported", TypeTag::I32, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: SET_VIDEO_MODE_AND_FRAME_RATE,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("videoMode", TypeTag::U32, PassBy::Value),
            p("frameRate", TypeTag::U32, PassBy::Value),
        ],
    },
    CallDesc {
        symbol: GET_FORMAT7_CONFIGURATION,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pImageSettings", TypeTag::Struct, PassBy::Ref),
            p("pPacketSize", TypeTag::U32, PassBy::Ref),
            p("pPercentage", TypeTag::F32, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: VALIDATE_FORMAT7_SETTINGS,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pImageSettings", TypeTag::Struct, PassBy::Ref),
            p("pSettingsAreValid", TypeTag::I32, PassBy::Ref),
            p("pPacketInfo", TypeTag::Struct, PassBy::Ref),
        ],
    },
    CallDesc {
        symbol: SET_FORMAT7_CONFIGURATION,
        ret: RetTag::Status,
        params: &[
            p("context", TypeTag::Ptr, PassBy::Value),
            p("pImageSettings", TypeTag::Struct, PassBy::Ref),
            p("percentSpeed", TypeTag::F32, PassBy::Value),
        ],
    },
];

/// All wrapped entry points, bound to one symbol source and ready to call.
pub struct Fc2Api {
    funcs: HashMap<&'static str, BoundFn>,
    registry: Arc<SchemaRegistry>,
    // Keeps the resolved function addresses alive.
    _source: Arc<dyn SymbolSource>,
}

impl std::fmt::Debug for Fc2Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fc2Api")
            .field("funcs", &self.funcs.len())
            .finish()
    }
}

impl Fc2Api {
    /// Binds every descriptor in [`DESCRIPTORS`] against `source`.
    pub fn bind(source: Arc<dyn SymbolSource>, registry: Arc<SchemaRegistry>) -> Result<Self> {
        let mut funcs = HashMap::with_capacity(DESCRIPTORS.len());
        for desc in DESCRIPTORS {
            funcs.insert(desc.symbol, desc.bind(source.as_ref())?);
        }
        Ok(Fc2Api {
            funcs,
            registry,
            _source: source,
        })
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Invokes a bound entry point and maps a nonzero status to
    /// [`Error::NativeCall`], carrying both the raw code and its symbolic
    /// `fc2Error` name.
    pub fn call(&self, name: &'static str, args: &mut [Arg<'_>]) -> Result<()> {
        let func = self.funcs.get(name).ok_or_else(|| Error::SymbolNotFound {
            symbol: name.to_string(),
        })?;
        let code = func.invoke(args)?;
        trace!(call = name, code, "native call returned");
        if code != 0 {
            return Err(Error::NativeCall {
                call: name,
                code,
                name: self.error_name(code),
            });
        }
        Ok(())
    }

    /// Symbolic name of an `fc2Error` code, or `UNKNOWN` for codes the table
    /// does not carry.
    pub fn error_name(&self, code: i32) -> String {
        self.registry
            .name_of("fc2Error", code as i64)
            .map(str::to_string)
            .unwrap_or_else(|_| "UNKNOWN".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::c_void;
    use std::ptr::NonNull;

    struct MissingConnect;

    impl SymbolSource for MissingConnect {
        fn resolve(&self, symbol: &str) -> Option<NonNull<c_void>> {
            if symbol == CONNECT {
                return None;
            }
            // Any nonnull address satisfies bind; these are never invoked.
            NonNull::new(resolve_marker as usize as *mut c_void)
        }
    }

    unsafe extern "C" fn resolve_marker() -> i32 {
        0
    }

    #[test]
    fn every_descriptor_has_a_dispatchable_shape() {
        struct All;
        impl SymbolSource for All {
            fn resolve(&self, _: &str) -> Option<NonNull<c_void>> {
                NonNull::new(resolve_marker as usize as *mut c_void)
            }
        }
        let api = Fc2Api::bind(Arc::new(All), Arc::new(SchemaRegistry::builtin())).unwrap();
        assert_eq!(api.funcs.len(), DESCRIPTORS.len());
    }

    #[test]
    fn missing_symbol_fails_bind_eagerly() {
        let err = Fc2Api::bind(
            Arc::new(MissingConnect),
            Arc::new(SchemaRegistry::builtin()),
        )
        .unwrap_err();
        match err {
            Error::SymbolNotFound { symbol } => assert_eq!(symbol, CONNECT),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn error_names_resolve_through_the_registry() {
        struct All;
        impl SymbolSource for All {
            fn resolve(&self, _: &str) -> Option<NonNull<c_void>> {
                NonNull::new(resolve_marker as usize as *mut c_void)
            }
        }
        let api = Fc2Api::bind(Arc::new(All), Arc::new(SchemaRegistry::builtin())).unwrap();
        assert_eq!(api.error_name(18), "FC2_ERROR_TIMEOUT");
        assert_eq!(api.error_name(9999), "UNKNOWN");
    }
}
