//! High-level camera session: connect, configure, capture.
//!
//! [`Camera`] wraps one camera handle resolved through an injected
//! [`ResourceManager`] and tracks the connect/capture state machine so that
//! redundant transitions are local no-ops and illegal ones are corrected
//! (grabbing implies connecting and starting capture first).

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api;
use crate::error::{Error, Result};
use crate::frame::{self, FrameMeta, SampleArray};
use crate::marshal::Arg;
use crate::resources::{ContextHandle, ResourceManager};
use crate::structs::{PgrGuid, RawFormat7PacketInfo, RawFormat7Settings, RawImage, RawProperty};

/// How a camera is identified on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraId {
    /// Position in the bus enumeration order; unstable across replug.
    Index(u32),
    /// The camera's serial number; stable across buses and reboots.
    Serial(u32),
}

impl FromStr for CameraId {
    type Err = Error;

    /// Parses a serial number. Index addressing is deliberate enough that it
    /// has no string form.
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u32>().map(CameraId::Serial).map_err(|_| {
            Error::InvalidConfig(format!("camera id must be a serial number, got {:?}", s))
        })
    }
}

/// The writable camera properties, as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Brightness,
    AutoExposure,
    Sharpness,
    WhiteBalance,
    Hue,
    Saturation,
    Gamma,
    Iris,
    Focus,
    Zoom,
    Pan,
    Tilt,
    Shutter,
    Gain,
    TriggerMode,
    TriggerDelay,
    FrameRate,
    Temperature,
}

impl PropertyKind {
    /// The `fc2PropertyType` symbol for this property.
    pub fn symbol(self) -> &'static str {
        match self {
            PropertyKind::Brightness => "FC2_BRIGHTNESS",
            PropertyKind::AutoExposure => "FC2_AUTO_EXPOSURE",
            PropertyKind::Sharpness => "FC2_SHARPNESS",
            PropertyKind::WhiteBalance => "FC2_WHITE_BALANCE",
            PropertyKind::Hue => "FC2_HUE",
            PropertyKind::Saturation => "FC2_SATURATION",
            PropertyKind::Gamma => "FC2_GAMMA",
            PropertyKind::Iris => "FC2_IRIS",
            PropertyKind::Focus => "FC2_FOCUS",
            PropertyKind::Zoom => "FC2_ZOOM",
            PropertyKind::Pan => "FC2_PAN",
            PropertyKind::Tilt => "FC2_TILT",
            PropertyKind::Shutter => "FC2_SHUTTER",
            PropertyKind::Gain => "FC2_GAIN",
            PropertyKind::TriggerMode => "FC2_TRIGGER_MODE",
            PropertyKind::TriggerDelay => "FC2_TRIGGER_DELAY",
            PropertyKind::FrameRate => "FC2_FRAME_RATE",
            PropertyKind::Temperature => "FC2_TEMPERATURE",
        }
    }

    pub fn all() -> impl Iterator<Item = PropertyKind> {
        [
            PropertyKind::Brightness,
            PropertyKind::AutoExposure,
            PropertyKind::Sharpness,
            PropertyKind::WhiteBalance,
            PropertyKind::Hue,
            PropertyKind::Saturation,
            PropertyKind::Gamma,
            PropertyKind::Iris,
            PropertyKind::Focus,
            PropertyKind::Zoom,
            PropertyKind::Pan,
            PropertyKind::Tilt,
            PropertyKind::Shutter,
            PropertyKind::Gain,
            PropertyKind::TriggerMode,
            PropertyKind::TriggerDelay,
            PropertyKind::FrameRate,
            PropertyKind::Temperature,
        ]
        .into_iter()
    }

    /// Boundary normalization for externally supplied identifiers: accepts
    /// the bare name (`"BRIGHTNESS"`), the full symbol (`"FC2_BRIGHTNESS"`),
    /// or the decimal code. Internal code passes `PropertyKind` values and
    /// never goes through here.
    pub fn resolve(input: &str) -> Result<PropertyKind> {
        let upper = input.trim().to_ascii_uppercase();
        for kind in PropertyKind::all() {
            let symbol = kind.symbol();
            if upper == symbol || upper == symbol["FC2_".len()..] {
                return Ok(kind);
            }
        }
        if let Ok(code) = upper.parse::<i64>() {
            for kind in PropertyKind::all() {
                if kind as i64 == code {
                    return Ok(kind);
                }
            }
        }
        Err(Error::UnknownKey {
            table: "fc2PropertyType".to_string(),
            key: input.to_string(),
        })
    }
}

/// A property as read from the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub kind: PropertyKind,
    pub present: bool,
    pub abs_control: bool,
    pub one_push: bool,
    pub on_off: bool,
    pub auto_manual_mode: bool,
    pub value_a: u32,
    pub value_b: u32,
    pub abs_value: f32,
}

impl Property {
    fn from_raw(kind: PropertyKind, raw: &RawProperty) -> Self {
        Property {
            kind,
            present: raw.present != 0,
            abs_control: raw.abs_control != 0,
            one_push: raw.one_push != 0,
            on_off: raw.on_off != 0,
            auto_manual_mode: raw.auto_manual_mode != 0,
            value_a: raw.value_a,
            value_b: raw.value_b,
            abs_value: raw.abs_value,
        }
    }
}

/// A partial property write. Only the fields that are `Some` change; the
/// rest keep whatever the camera currently reports. An update with no fields
/// set performs no native calls at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    pub abs_control: Option<bool>,
    pub one_push: Option<bool>,
    pub on_off: Option<bool>,
    pub auto_manual_mode: Option<bool>,
    pub value_a: Option<u32>,
    pub value_b: Option<u32>,
    pub abs_value: Option<f32>,
}

impl PropertyUpdate {
    pub fn is_empty(&self) -> bool {
        *self == PropertyUpdate::default()
    }

    fn apply(&self, raw: &mut RawProperty) {
        if let Some(v) = self.abs_control {
            raw.abs_control = v as i32;
        }
        if let Some(v) = self.one_push {
            raw.one_push = v as i32;
        }
        if let Some(v) = self.on_off {
            raw.on_off = v as i32;
        }
        if let Some(v) = self.auto_manual_mode {
            raw.auto_manual_mode = v as i32;
        }
        if let Some(v) = self.value_a {
            raw.value_a = v;
        }
        if let Some(v) = self.value_b {
            raw.value_b = v;
        }
        if let Some(v) = self.abs_value {
            raw.abs_value = v;
        }
    }
}

/// Format7 region and pixel format, with the format held symbolically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format7Settings {
    pub mode: i32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub width: u32,
    pub height: u32,
    pub pixel_format: String,
}

/// Current Format7 configuration as reported by the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format7Config {
    pub settings: Format7Settings,
    pub packet_size: u32,
    pub packet_percentage: f32,
}

/// Packet size bounds from Format7 validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format7PacketInfo {
    pub recommended_bytes_per_packet: u32,
    pub max_bytes_per_packet: u32,
    pub unit_bytes_per_packet: u32,
}

/// Options for a single [`Camera::grab`].
#[derive(Debug, Clone)]
pub struct GrabOptions {
    /// Convert the retrieved frame to this pixel format before copy-out.
    /// `None` returns the sensor's native format.
    pub pixel_format: Option<String>,
    /// Stop capture after the frame is taken. Leaving capture running makes
    /// back-to-back grabs cheaper.
    pub stop_after: bool,
    /// How many empty frames to tolerate before giving up. A retrieval that
    /// delivers zero bytes is retried, not returned.
    pub empty_frame_retries: u32,
}

impl Default for GrabOptions {
    fn default() -> Self {
        GrabOptions {
            pixel_format: None,
            stop_after: true,
            empty_frame_retries: 4,
        }
    }
}

/// A captured frame: owned pixels plus resolved metadata.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: SampleArray,
    pub meta: FrameMeta,
}

/// One camera session over an injected resource manager.
///
/// Context sharing is explicit: cameras built with [`Camera::new`] share the
/// manager's default context, and [`Camera::with_context`] picks a different
/// context index for callers that need isolation.
pub struct Camera {
    mgr: Arc<ResourceManager>,
    ctx: ContextHandle,
    guid: PgrGuid,
    connected: bool,
    capturing: bool,
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("guid", &self.guid)
            .field("connected", &self.connected)
            .field("capturing", &self.capturing)
            .finish()
    }
}

impl Camera {
    /// Resolves `id` on the manager's default context.
    pub fn new(mgr: Arc<ResourceManager>, id: CameraId) -> Result<Self> {
        Self::with_context(mgr, id, 0)
    }

    /// Resolves `id` on the context at `context_index`, creating the context
    /// if needed. Distinct indices give fully isolated capture streams.
    pub fn with_context(mgr: Arc<ResourceManager>, id: CameraId, context_index: usize) -> Result<Self> {
        let ctx = mgr.context(context_index)?;
        let mut guid = PgrGuid::zeroed();
        let guid_ptr = &mut guid as *mut PgrGuid as *mut std::ffi::c_void;
        match id {
            CameraId::Index(index) => mgr.api().call(
                api::GET_CAMERA_FROM_INDEX,
                &mut [
                    Arg::Ptr(ctx.as_ptr()),
                    Arg::Int(index as i64),
                    Arg::StructRef(guid_ptr),
                ],
            )?,
            CameraId::Serial(serial) => mgr.api().call(
                api::GET_CAMERA_FROM_SERIAL_NUMBER,
                &mut [
                    Arg::Ptr(ctx.as_ptr()),
                    Arg::Int(serial as i64),
                    Arg::StructRef(guid_ptr),
                ],
            )?,
        }
        debug!(?id, "resolved camera guid");
        Ok(Camera {
            mgr,
            ctx,
            guid,
            connected: false,
            capturing: false,
        })
    }

    pub fn guid(&self) -> PgrGuid {
        self.guid
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Connects to the camera. Already connected is a no-op.
    pub fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        let guid_ptr = &mut self.guid as *mut PgrGuid as *mut std::ffi::c_void;
        self.mgr
            .api()
            .call(
                api::CONNECT,
                &mut [Arg::Ptr(self.ctx.as_ptr()), Arg::StructRef(guid_ptr)],
            )
            .map_err(|err| match err {
                Error::NativeCall { code, name, .. } => Error::ConnectFailed { code, name },
                other => other,
            })?;
        self.connected = true;
        info!("camera connected");
        Ok(())
    }

    /// Disconnects. Capture is stopped first if it is running; not being
    /// connected is a no-op.
    pub fn disconnect(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.stop_capture()?;
        self.mgr
            .api()
            .call(api::DISCONNECT, &mut [Arg::Ptr(self.ctx.as_ptr())])?;
        self.connected = false;
        info!("camera disconnected");
        Ok(())
    }

    /// Starts isochronous capture, connecting first if needed. Already
    /// capturing is a no-op.
    pub fn start_capture(&mut self) -> Result<()> {
        if self.capturing {
            return Ok(());
        }
        self.connect()?;
        self.mgr
            .api()
            .call(api::START_CAPTURE, &mut [Arg::Ptr(self.ctx.as_ptr())])?;
        self.capturing = true;
        debug!("capture started");
        Ok(())
    }

    /// Stops capture. Not capturing is a no-op.
    pub fn stop_capture(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }
        self.mgr
            .api()
            .call(api::STOP_CAPTURE, &mut [Arg::Ptr(self.ctx.as_ptr())])?;
        self.capturing = false;
        debug!("capture stopped");
        Ok(())
    }

    /// Reads one property from the camera.
    pub fn property(&self, kind: PropertyKind) -> Result<Property> {
        let mut raw = RawProperty::for_type(kind as i32);
        self.mgr.api().call(
            api::GET_PROPERTY,
            &mut [
                Arg::Ptr(self.ctx.as_ptr()),
                Arg::StructRef(&mut raw as *mut RawProperty as *mut std::ffi::c_void),
            ],
        )?;
        Ok(Property::from_raw(kind, &raw))
    }

    /// Applies a partial property write: reads the current block, overlays
    /// the fields set in `update`, and writes it back. An empty update
    /// returns without touching the camera.
    pub fn set_property(&self, kind: PropertyKind, update: PropertyUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let mut raw = RawProperty::for_type(kind as i32);
        let raw_ptr = &mut raw as *mut RawProperty as *mut std::ffi::c_void;
        self.mgr.api().call(
            api::GET_PROPERTY,
            &mut [Arg::Ptr(self.ctx.as_ptr()), Arg::StructRef(raw_ptr)],
        )?;
        update.apply(&mut raw);
        self.mgr.api().call(
            api::SET_PROPERTY,
            &mut [Arg::Ptr(self.ctx.as_ptr()), Arg::StructRef(raw_ptr)],
        )?;
        debug!(kind = kind.symbol(), "property updated");
        Ok(())
    }

    /// Current video mode and frame rate, as their symbolic names.
    pub fn video_mode(&self) -> Result<(String, String)> {
        let mut mode = 0u32;
        let mut rate = 0u32;
        self.mgr.api().call(
            api::GET_VIDEO_MODE_AND_FRAME_RATE,
            &mut [
                Arg::Ptr(self.ctx.as_ptr()),
                Arg::OutU32(&mut mode),
                Arg::OutU32(&mut rate),
            ],
        )?;
        let registry = self.mgr.api().registry();
        Ok((
            registry.name_of("fc2VideoMode", mode as i64)?.to_string(),
            registry.name_of("fc2FrameRate", rate as i64)?.to_string(),
        ))
    }

    /// Asks the camera whether it supports a video mode / frame rate pair.
    pub fn validate_video_mode(&self, mode: &str, frame_rate: &str) -> Result<bool> {
        let (mode, rate) = self.video_mode_codes(mode, frame_rate)?;
        let mut supported = 0i32;
        self.mgr.api().call(
            api::GET_VIDEO_MODE_AND_FRAME_RATE_INFO,
            &mut [
                Arg::Ptr(self.ctx.as_ptr()),
                Arg::Int(mode),
                Arg::Int(rate),
                Arg::OutI32(&mut supported),
            ],
        )?;
        Ok(supported != 0)
    }

    /// Validates and then applies a video mode / frame rate pair. Pairs the
    /// camera rejects never reach the mode switch.
    pub fn set_video_mode(&self, mode: &str, frame_rate: &str) -> Result<()> {
        if !self.validate_video_mode(mode, frame_rate)? {
            return Err(Error::InvalidConfig(format!(
                "camera rejected video mode {} at {}",
                mode, frame_rate
            )));
        }
        let (mode_code, rate_code) = self.video_mode_codes(mode, frame_rate)?;
        self.mgr.api().call(
            api::SET_VIDEO_MODE_AND_FRAME_RATE,
            &mut [
                Arg::Ptr(self.ctx.as_ptr()),
                Arg::Int(mode_code),
                Arg::Int(rate_code),
            ],
        )?;
        info!(mode, frame_rate, "video mode applied");
        Ok(())
    }

    fn video_mode_codes(&self, mode: &str, frame_rate: &str) -> Result<(i64, i64)> {
        let registry = self.mgr.api().registry();
        Ok((
            registry.code_of("fc2VideoMode", mode)?,
            registry.code_of("fc2FrameRate", frame_rate)?,
        ))
    }

    /// Current Format7 configuration.
    pub fn format7_config(&self) -> Result<Format7Config> {
        let mut raw = RawFormat7Settings::zeroed();
        let mut packet_size = 0u32;
        let mut percentage = 0f32;
        self.mgr.api().call(
            api::GET_FORMAT7_CONFIGURATION,
            &mut [
                Arg::Ptr(self.ctx.as_ptr()),
                Arg::StructRef(&mut raw as *mut RawFormat7Settings as *mut std::ffi::c_void),
                Arg::OutU32(&mut packet_size),
                Arg::OutF32(&mut percentage),
            ],
        )?;
        Ok(Format7Config {
            settings: self.settings_from_raw(&raw)?,
            packet_size,
            packet_percentage: percentage,
        })
    }

    /// Asks the camera whether `settings` are acceptable, returning the
    /// packet size bounds it reports alongside the verdict.
    pub fn validate_format7(&self, settings: &Format7Settings) -> Result<(bool, Format7PacketInfo)> {
        let mut raw = self.settings_to_raw(settings)?;
        let mut valid = 0i32;
        let mut packet = RawFormat7PacketInfo::zeroed();
        self.mgr.api().call(
            api::VALIDATE_FORMAT7_SETTINGS,
            &mut [
                Arg::Ptr(self.ctx.as_ptr()),
                Arg::StructRef(&mut raw as *mut RawFormat7Settings as *mut std::ffi::c_void),
                Arg::OutI32(&mut valid),
                Arg::StructRef(&mut packet as *mut RawFormat7PacketInfo as *mut std::ffi::c_void),
            ],
        )?;
        Ok((
            valid != 0,
            Format7PacketInfo {
                recommended_bytes_per_packet: packet.recommended_bytes_per_packet,
                max_bytes_per_packet: packet.max_bytes_per_packet,
                unit_bytes_per_packet: packet.unit_bytes_per_packet,
            },
        ))
    }

    /// Validates and then applies Format7 settings at the given packet speed
    /// percentage. Settings the camera rejects never reach the configuration
    /// call.
    pub fn set_format7(&self, settings: &Format7Settings, percent_speed: f32) -> Result<()> {
        let (valid, _) = self.validate_format7(settings)?;
        if !valid {
            return Err(Error::InvalidConfig(format!(
                "camera rejected {}x{}+{}+{} mode {} ({})",
                settings.width,
                settings.height,
                settings.offset_x,
                settings.offset_y,
                settings.mode,
                settings.pixel_format,
            )));
        }
        let mut raw = self.settings_to_raw(settings)?;
        self.mgr.api().call(
            api::SET_FORMAT7_CONFIGURATION,
            &mut [
                Arg::Ptr(self.ctx.as_ptr()),
                Arg::StructRef(&mut raw as *mut RawFormat7Settings as *mut std::ffi::c_void),
                Arg::Float(percent_speed as f64),
            ],
        )?;
        info!(
            width = settings.width,
            height = settings.height,
            format = %settings.pixel_format,
            "format7 configuration applied"
        );
        Ok(())
    }

    /// Captures one frame.
    ///
    /// Connects and starts capture if needed, retrieves a buffer (retrying
    /// empty frames up to the option budget), optionally converts to the
    /// requested pixel format, copies the pixels into an owned array, and
    /// releases every native buffer before returning.
    pub fn grab(&mut self, options: &GrabOptions) -> Result<Frame> {
        self.start_capture()?;
        let raw = self.mgr.acquire_image()?;
        let result = self.grab_into(raw, options);
        self.mgr.destroy_image(raw);
        if options.stop_after {
            self.stop_capture()?;
        }
        result
    }

    fn grab_into(&mut self, raw: *mut RawImage, options: &GrabOptions) -> Result<Frame> {
        let raw_ptr = raw as *mut std::ffi::c_void;
        let mut attempts = 0u32;
        loop {
            self.mgr.api().call(
                api::RETRIEVE_BUFFER,
                &mut [Arg::Ptr(self.ctx.as_ptr()), Arg::StructRef(raw_ptr)],
            )?;
            // Safety: the manager keeps the header alive; the SDK filled it.
            let received = unsafe { (*raw).received_data_size };
            if received > 0 {
                break;
            }
            attempts += 1;
            if attempts > options.empty_frame_retries {
                return Err(Error::CaptureFailed(format!(
                    "{} consecutive empty frames",
                    attempts
                )));
            }
            warn!(attempt = attempts, "empty frame, retrying retrieval");
        }
        match &options.pixel_format {
            None => {
                let image = unsafe { *raw };
                let data = frame::copy_out(&image)?;
                let meta = FrameMeta::from_raw(&image, self.mgr.api().registry())?;
                Ok(Frame { data, meta })
            }
            Some(format) => {
                let code = self
                    .mgr
                    .api()
                    .registry()
                    .code_of("fc2PixelFormat", format)?;
                let image = unsafe { *raw };
                if image.format_code() == code {
                    // Already in the requested format.
                    let data = frame::copy_out(&image)?;
                    let meta = FrameMeta::from_raw(&image, self.mgr.api().registry())?;
                    return Ok(Frame { data, meta });
                }
                let converted = self.mgr.acquire_image()?;
                let result = self.convert_and_copy(raw_ptr, converted, code);
                self.mgr.destroy_image(converted);
                result
            }
        }
    }

    fn convert_and_copy(
        &self,
        src: *mut std::ffi::c_void,
        dst: *mut RawImage,
        format_code: i64,
    ) -> Result<Frame> {
        self.mgr.api().call(
            api::CONVERT_IMAGE_TO,
            &mut [
                Arg::Int(format_code),
                Arg::StructRef(src),
                Arg::StructRef(dst as *mut std::ffi::c_void),
            ],
        )?;
        let image = unsafe { *dst };
        let data = frame::copy_out(&image)?;
        let meta = FrameMeta::from_raw(&image, self.mgr.api().registry())?;
        Ok(Frame { data, meta })
    }

    fn settings_from_raw(&self, raw: &RawFormat7Settings) -> Result<Format7Settings> {
        Ok(Format7Settings {
            mode: raw.mode,
            offset_x: raw.offset_x,
            offset_y: raw.offset_y,
            width: raw.width,
            height: raw.height,
            pixel_format: self
                .mgr
                .api()
                .registry()
                .name_of("fc2PixelFormat", raw.pixel_format as i64)?
                .to_string(),
        })
    }

    fn settings_to_raw(&self, settings: &Format7Settings) -> Result<RawFormat7Settings> {
        let code = self
            .mgr
            .api()
            .registry()
            .code_of("fc2PixelFormat", &settings.pixel_format)?;
        Ok(RawFormat7Settings {
            mode: settings.mode,
            offset_x: settings.offset_x,
            offset_y: settings.offset_y,
            width: settings.width,
            height: settings.height,
            pixel_format: code as u32,
            reserved: [0; 8],
        })
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Err(err) = self.disconnect() {
            warn!(%err, "camera teardown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_kinds_match_the_native_codes() {
        assert_eq!(PropertyKind::Brightness as i32, 0);
        assert_eq!(PropertyKind::Shutter as i32, 12);
        assert_eq!(PropertyKind::Temperature as i32, 17);
        assert_eq!(PropertyKind::all().count(), 18);
    }

    #[test]
    fn resolve_accepts_bare_and_prefixed_names() {
        assert_eq!(
            PropertyKind::resolve("BRIGHTNESS").unwrap(),
            PropertyKind::Brightness
        );
        assert_eq!(
            PropertyKind::resolve("FC2_WHITE_BALANCE").unwrap(),
            PropertyKind::WhiteBalance
        );
        assert_eq!(
            PropertyKind::resolve("gain").unwrap(),
            PropertyKind::Gain
        );
        assert_eq!(PropertyKind::resolve("13").unwrap(), PropertyKind::Gain);
        assert!(matches!(
            PropertyKind::resolve("APERTURE"),
            Err(Error::UnknownKey { .. })
        ));
    }

    #[test]
    fn camera_id_parses_serial_numbers_only() {
        assert_eq!("13421055".parse::<CameraId>().unwrap(), CameraId::Serial(13421055));
        assert!(matches!(
            "first".parse::<CameraId>(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(PropertyUpdate::default().is_empty());
        let update = PropertyUpdate {
            value_a: Some(3),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn update_overlays_only_set_fields() {
        let mut raw = RawProperty::for_type(0);
        raw.value_a = 10;
        raw.value_b = 20;
        raw.on_off = 1;
        let update = PropertyUpdate {
            value_a: Some(99),
            auto_manual_mode: Some(true),
            ..Default::default()
        };
        update.apply(&mut raw);
        assert_eq!(raw.value_a, 99);
        assert_eq!(raw.value_b, 20);
        assert_eq!(raw.on_off, 1);
        assert_eq!(raw.auto_manual_mode, 1);
    }
}
