//! Captured frames as owned pixel arrays plus metadata.

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::SchemaRegistry;
use crate::structs::RawImage;

/// Owned pixel data copied out of a native image buffer.
///
/// Single-channel formats come back as a 2-D array, interleaved multi-channel
/// formats as rows x cols x channels. Either way the data is an independent
/// copy; the native buffer is released before the frame is returned.
#[derive(Debug, Clone)]
pub enum SampleArray {
    Mono(Array2<u8>),
    Interleaved(Array3<u8>),
}

impl SampleArray {
    /// (rows, cols, channels).
    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            SampleArray::Mono(a) => {
                let (r, c) = a.dim();
                (r, c, 1)
            }
            SampleArray::Interleaved(a) => a.dim(),
        }
    }
}

/// Header fields of a retrieved frame, with the format codes resolved to
/// their symbolic names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMeta {
    pub rows: i32,
    pub cols: i32,
    pub stride: i32,
    pub data_size: i32,
    pub received_size: i32,
    pub format: String,
    pub bayer_format: String,
}

impl FrameMeta {
    pub(crate) fn from_raw(raw: &RawImage, registry: &SchemaRegistry) -> Result<Self> {
        Ok(FrameMeta {
            rows: raw.rows,
            cols: raw.cols,
            stride: raw.stride,
            data_size: raw.data_size,
            received_size: raw.received_data_size,
            format: registry
                .name_of("fc2PixelFormat", raw.format_code())?
                .to_string(),
            bayer_format: registry
                .name_of("fc2BayerTileFormat", raw.bayer_code())?
                .to_string(),
        })
    }
}

/// Copies a native image buffer into an owned array.
///
/// The channel count is derived from the buffer geometry (`data_size /
/// (rows * cols)`) rather than from the pixel format table, which keeps the
/// copy correct for any 8-bit-per-channel format.
pub(crate) fn copy_out(raw: &RawImage) -> Result<SampleArray> {
    let rows = usize::try_from(raw.rows)
        .map_err(|_| Error::CaptureFailed(format!("negative row count {}", raw.rows)))?;
    let cols = usize::try_from(raw.cols)
        .map_err(|_| Error::CaptureFailed(format!("negative column count {}", raw.cols)))?;
    let data_size = usize::try_from(raw.data_size)
        .map_err(|_| Error::CaptureFailed(format!("negative data size {}", raw.data_size)))?;
    if rows == 0 || cols == 0 {
        return Err(Error::CaptureFailed("image has zero extent".to_string()));
    }
    if raw.data.is_null() {
        return Err(Error::CaptureFailed("image has no data pointer".to_string()));
    }
    let depth = data_size / (rows * cols);
    if depth == 0 || data_size != rows * cols * depth {
        return Err(Error::CaptureFailed(format!(
            "data size {} does not tile {}x{}",
            data_size, rows, cols
        )));
    }
    // Safety: the SDK guarantees data points at data_size readable bytes for
    // as long as the image header is alive, and the caller holds it alive
    // across this copy.
    let bytes = unsafe { std::slice::from_raw_parts(raw.data, data_size) };
    if depth == 1 {
        let arr = Array2::from_shape_vec((rows, cols), bytes.to_vec())
            .map_err(|e| Error::CaptureFailed(e.to_string()))?;
        Ok(SampleArray::Mono(arr))
    } else {
        let arr = Array3::from_shape_vec((rows, cols, depth), bytes.to_vec())
            .map_err(|e| Error::CaptureFailed(e.to_string()))?;
        Ok(SampleArray::Interleaved(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_over(buf: &mut [u8], rows: i32, cols: i32) -> RawImage {
        let mut raw = RawImage::zeroed();
        raw.rows = rows;
        raw.cols = cols;
        raw.stride = cols;
        raw.data = buf.as_mut_ptr();
        raw.data_size = buf.len() as i32;
        raw.received_data_size = buf.len() as i32;
        raw
    }

    #[test]
    fn mono_buffer_copies_to_2d() {
        let mut buf: Vec<u8> = (0..12).collect();
        let raw = raw_over(&mut buf, 3, 4);
        let arr = copy_out(&raw).unwrap();
        match arr {
            SampleArray::Mono(a) => {
                assert_eq!(a.dim(), (3, 4));
                assert_eq!(a[[2, 3]], 11);
            }
            other => panic!("expected mono, got {:?}", other.dim()),
        }
    }

    #[test]
    fn rgb_buffer_copies_to_3d() {
        let mut buf = vec![7u8; 2 * 5 * 3];
        let raw = raw_over(&mut buf, 2, 5);
        let arr = copy_out(&raw).unwrap();
        match arr {
            SampleArray::Interleaved(a) => assert_eq!(a.dim(), (2, 5, 3)),
            other => panic!("expected interleaved, got {:?}", other.dim()),
        }
    }

    #[test]
    fn ragged_buffer_is_rejected() {
        let mut buf = vec![0u8; 13];
        let raw = raw_over(&mut buf, 3, 4);
        assert!(matches!(copy_out(&raw), Err(Error::CaptureFailed(_))));
    }

    #[test]
    fn empty_geometry_is_rejected() {
        let mut buf = vec![0u8; 4];
        let raw = raw_over(&mut buf, 0, 4);
        assert!(matches!(copy_out(&raw), Err(Error::CaptureFailed(_))));
    }

    #[test]
    fn meta_resolves_format_names() {
        let registry = SchemaRegistry::builtin();
        let mut buf = vec![0u8; 6];
        let mut raw = raw_over(&mut buf, 2, 3);
        raw.format = 2147483648u32 as i32; // FC2_PIXEL_FORMAT_MONO8
        raw.bayer_format = 0;
        let meta = FrameMeta::from_raw(&raw, &registry).unwrap();
        assert_eq!(meta.format, "FC2_PIXEL_FORMAT_MONO8");
        assert_eq!(meta.bayer_format, "FC2_BT_NONE");
        assert_eq!(meta.received_size, 6);
    }
}
