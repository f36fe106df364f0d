//! Built-in FlyCapture2 enumeration tables.
//!
//! Transcribed from the C header for the tables the wrapper actually drives.
//! Vendor aliases that share a code (e.g. `FC2_PIXEL_FORMAT_RGB`) and the
//! `*_FORCE_32BITS` padding sentinels are omitted so every table stays
//! bijective. Additional tables can be supplied at configuration time via
//! [`crate::schema::SchemaRegistry::load_json`].

pub(crate) const ERROR_CODES: &[(&str, i64)] = &[
    ("FC2_ERROR_UNDEFINED", -1),
    ("FC2_ERROR_OK", 0),
    ("FC2_ERROR_FAILED", 1),
    ("FC2_ERROR_NOT_IMPLEMENTED", 2),
    ("FC2_ERROR_FAILED_BUS_MASTER_CONNECTION", 3),
    ("FC2_ERROR_NOT_CONNECTED", 4),
    ("FC2_ERROR_INIT_FAILED", 5),
    ("FC2_ERROR_NOT_INTITIALIZED", 6),
    ("FC2_ERROR_INVALID_PARAMETER", 7),
    ("FC2_ERROR_INVALID_SETTINGS", 8),
    ("FC2_ERROR_INVALID_BUS_MANAGER", 9),
    ("FC2_ERROR_MEMORY_ALLOCATION_FAILED", 10),
    ("FC2_ERROR_LOW_LEVEL_FAILURE", 11),
    ("FC2_ERROR_NOT_FOUND", 12),
    ("FC2_ERROR_FAILED_GUID", 13),
    ("FC2_ERROR_INVALID_PACKET_SIZE", 14),
    ("FC2_ERROR_INVALID_MODE", 15),
    ("FC2_ERROR_NOT_IN_FORMAT7", 16),
    ("FC2_ERROR_NOT_SUPPORTED", 17),
    ("FC2_ERROR_TIMEOUT", 18),
    ("FC2_ERROR_BUS_MASTER_FAILED", 19),
    ("FC2_ERROR_INVALID_GENERATION", 20),
    ("FC2_ERROR_LUT_FAILED", 21),
    ("FC2_ERROR_IIDC_FAILED", 22),
    ("FC2_ERROR_STROBE_FAILED", 23),
    ("FC2_ERROR_TRIGGER_FAILED", 24),
    ("FC2_ERROR_PROPERTY_FAILED", 25),
    ("FC2_ERROR_PROPERTY_NOT_PRESENT", 26),
    ("FC2_ERROR_REGISTER_FAILED", 27),
    ("FC2_ERROR_READ_REGISTER_FAILED", 28),
    ("FC2_ERROR_WRITE_REGISTER_FAILED", 29),
    ("FC2_ERROR_ISOCH_FAILED", 30),
    ("FC2_ERROR_ISOCH_ALREADY_STARTED", 31),
    ("FC2_ERROR_ISOCH_NOT_STARTED", 32),
    ("FC2_ERROR_ISOCH_START_FAILED", 33),
    ("FC2_ERROR_ISOCH_RETRIEVE_BUFFER_FAILED", 34),
    ("FC2_ERROR_ISOCH_STOP_FAILED", 35),
    ("FC2_ERROR_ISOCH_SYNC_FAILED", 36),
    ("FC2_ERROR_ISOCH_BANDWIDTH_EXCEEDED", 37),
    ("FC2_ERROR_IMAGE_CONVERSION_FAILED", 38),
    ("FC2_ERROR_IMAGE_LIBRARY_FAILURE", 39),
    ("FC2_ERROR_BUFFER_TOO_SMALL", 40),
    ("FC2_ERROR_IMAGE_CONSISTENCY_ERROR", 41),
];

pub(crate) const PROPERTY_TYPES: &[(&str, i64)] = &[
    ("FC2_BRIGHTNESS", 0),
    ("FC2_AUTO_EXPOSURE", 1),
    ("FC2_SHARPNESS", 2),
    ("FC2_WHITE_BALANCE", 3),
    ("FC2_HUE", 4),
    ("FC2_SATURATION", 5),
    ("FC2_GAMMA", 6),
    ("FC2_IRIS", 7),
    ("FC2_FOCUS", 8),
    ("FC2_ZOOM", 9),
    ("FC2_PAN", 10),
    ("FC2_TILT", 11),
    ("FC2_SHUTTER", 12),
    ("FC2_GAIN", 13),
    ("FC2_TRIGGER_MODE", 14),
    ("FC2_TRIGGER_DELAY", 15),
    ("FC2_FRAME_RATE", 16),
    ("FC2_TEMPERATURE", 17),
    ("FC2_UNSPECIFIED_PROPERTY_TYPE", 18),
];

pub(crate) const FRAME_RATES: &[(&str, i64)] = &[
    ("FC2_FRAMERATE_1_875", 0),
    ("FC2_FRAMERATE_3_75", 1),
    ("FC2_FRAMERATE_7_5", 2),
    ("FC2_FRAMERATE_15", 3),
    ("FC2_FRAMERATE_30", 4),
    ("FC2_FRAMERATE_60", 5),
    ("FC2_FRAMERATE_120", 6),
    ("FC2_FRAMERATE_240", 7),
    ("FC2_FRAMERATE_FORMAT7", 8),
    ("FC2_NUM_FRAMERATES", 9),
];

pub(crate) const VIDEO_MODES: &[(&str, i64)] = &[
    ("FC2_VIDEOMODE_160x120YUV444", 0),
    ("FC2_VIDEOMODE_320x240YUV422", 1),
    ("FC2_VIDEOMODE_640x480YUV411", 2),
    ("FC2_VIDEOMODE_640x480YUV422", 3),
    ("FC2_VIDEOMODE_640x480RGB", 4),
    ("FC2_VIDEOMODE_640x480Y8", 5),
    ("FC2_VIDEOMODE_640x480Y16", 6),
    ("FC2_VIDEOMODE_800x600YUV422", 7),
    ("FC2_VIDEOMODE_800x600RGB", 8),
    ("FC2_VIDEOMODE_800x600Y8", 9),
    ("FC2_VIDEOMODE_800x600Y16", 10),
    ("FC2_VIDEOMODE_1024x768YUV422", 11),
    ("FC2_VIDEOMODE_1024x768RGB", 12),
    ("FC2_VIDEOMODE_1024x768Y8", 13),
    ("FC2_VIDEOMODE_1024x768Y16", 14),
    ("FC2_VIDEOMODE_1280x960YUV422", 15),
    ("FC2_VIDEOMODE_1280x960RGB", 16),
    ("FC2_VIDEOMODE_1280x960Y8", 17),
    ("FC2_VIDEOMODE_1280x960Y16", 18),
    ("FC2_VIDEOMODE_1600x1200YUV422", 19),
    ("FC2_VIDEOMODE_1600x1200RGB", 20),
    ("FC2_VIDEOMODE_1600x1200Y8", 21),
    ("FC2_VIDEOMODE_1600x1200Y16", 22),
    ("FC2_VIDEOMODE_FORMAT7", 23),
    ("FC2_NUM_VIDEOMODES", 24),
];

pub(crate) const PIXEL_FORMATS: &[(&str, i64)] = &[
    ("FC2_UNSPECIFIED_PIXEL_FORMAT", 0),
    ("FC2_NUM_PIXEL_FORMATS", 20),
    ("FC2_PIXEL_FORMAT_RAW12", 524288),
    ("FC2_PIXEL_FORMAT_MONO12", 1048576),
    ("FC2_PIXEL_FORMAT_RAW16", 2097152),
    ("FC2_PIXEL_FORMAT_RAW8", 4194304),
    ("FC2_PIXEL_FORMAT_S_RGB16", 8388608),
    ("FC2_PIXEL_FORMAT_S_MONO16", 16777216),
    ("FC2_PIXEL_FORMAT_RGB16", 33554432),
    ("FC2_PIXEL_FORMAT_BGR16", 33554433),
    ("FC2_PIXEL_FORMAT_BGRU16", 33554434),
    ("FC2_PIXEL_FORMAT_MONO16", 67108864),
    ("FC2_PIXEL_FORMAT_RGB8", 134217728),
    ("FC2_PIXEL_FORMAT_444YUV8", 268435456),
    ("FC2_PIXEL_FORMAT_422YUV8", 536870912),
    ("FC2_PIXEL_FORMAT_411YUV8", 1073741824),
    ("FC2_PIXEL_FORMAT_422YUV8_JPEG", 1073741825),
    ("FC2_PIXEL_FORMAT_RGBU", 1073741826),
    ("FC2_PIXEL_FORMAT_BGRU", 1073741832),
    ("FC2_PIXEL_FORMAT_MONO8", 2147483648),
    ("FC2_PIXEL_FORMAT_BGR", 2147483656),
];

pub(crate) const BAYER_TILE_FORMATS: &[(&str, i64)] = &[
    ("FC2_BT_NONE", 0),
    ("FC2_BT_RGGB", 1),
    ("FC2_BT_GRBG", 2),
    ("FC2_BT_GBRG", 3),
    ("FC2_BT_BGGR", 4),
];
