//! Context and image buffer lifecycle management.
//!
//! The [`ResourceManager`] owns every native context and image the wrapper
//! allocates and releases them when it is dropped. It is created explicitly
//! and injected into each [`crate::camera::Camera`], so two cameras share a
//! context only when the caller hands them the same manager; there is no
//! process-global state.

use std::ffi::c_void;
use std::ptr;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::api::{self, Fc2Api};
use crate::error::{Error, Result};
use crate::marshal::Arg;
use crate::structs::RawImage;

/// Opaque native `fc2Context` handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextHandle(pub(crate) *mut c_void);

// Contexts are plain handles; the SDK serializes access internally and every
// call through them goes via the manager's Fc2Api.
unsafe impl Send for ContextHandle {}
unsafe impl Sync for ContextHandle {}

impl ContextHandle {
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

struct ImagePool {
    images: Vec<*mut RawImage>,
}

unsafe impl Send for ImagePool {}

/// Owner of all native contexts and image buffers.
pub struct ResourceManager {
    api: Arc<Fc2Api>,
    contexts: Mutex<Vec<ContextHandle>>,
    images: Mutex<ImagePool>,
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("contexts", &self.context_count())
            .field("images", &self.image_count())
            .finish()
    }
}

impl ResourceManager {
    pub fn new(api: Arc<Fc2Api>) -> Self {
        ResourceManager {
            api,
            contexts: Mutex::new(Vec::new()),
            images: Mutex::new(ImagePool { images: Vec::new() }),
        }
    }

    pub fn api(&self) -> &Arc<Fc2Api> {
        &self.api
    }

    /// Returns the context at `index`, creating contexts up to and including
    /// that index on first use. Index 0 is the default context most callers
    /// share; a camera that must not share asks for a fresh index.
    pub fn context(&self, index: usize) -> Result<ContextHandle> {
        let mut contexts = self.contexts.lock().unwrap_or_else(|e| e.into_inner());
        while contexts.len() <= index {
            let mut handle: *mut c_void = ptr::null_mut();
            self.api
                .call(api::CREATE_CONTEXT, &mut [Arg::OutPtr(&mut handle)])
                .map_err(|err| match err {
                    Error::NativeCall { code, name, .. } => Error::CreateFailed {
                        resource: "context",
                        code,
                        name,
                    },
                    other => other,
                })?;
            debug!(index = contexts.len(), "created fc2 context");
            contexts.push(ContextHandle(handle));
        }
        Ok(contexts[index])
    }

    pub fn context_count(&self) -> usize {
        self.contexts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Destroys every context. Errors are logged, not propagated; contexts
    /// are only torn down in bulk, never one at a time.
    pub fn dispose_contexts(&self) {
        let mut contexts = self.contexts.lock().unwrap_or_else(|e| e.into_inner());
        for ctx in contexts.drain(..) {
            if let Err(err) = self
                .api
                .call(api::DESTROY_CONTEXT, &mut [Arg::Ptr(ctx.0)])
            {
                warn!(%err, "failed to destroy fc2 context");
            }
        }
    }

    /// Allocates a native image header and registers it with the SDK.
    /// The returned pointer stays valid until [`destroy_image`] or drop.
    ///
    /// [`destroy_image`]: Self::destroy_image
    pub fn acquire_image(&self) -> Result<*mut RawImage> {
        let raw = Box::into_raw(Box::new(RawImage::zeroed()));
        if let Err(err) = self
            .api
            .call(api::CREATE_IMAGE, &mut [Arg::StructRef(raw as *mut c_void)])
        {
            // Reclaim the header before reporting; the SDK never saw it.
            drop(unsafe { Box::from_raw(raw) });
            return Err(match err {
                Error::NativeCall { code, name, .. } => Error::CreateFailed {
                    resource: "image",
                    code,
                    name,
                },
                other => other,
            });
        }
        let mut pool = self.images.lock().unwrap_or_else(|e| e.into_inner());
        pool.images.push(raw);
        Ok(raw)
    }

    /// Releases one image. Unknown pointers are ignored, so releasing the
    /// same image twice is a no-op rather than a double free.
    pub fn destroy_image(&self, image: *mut RawImage) {
        let mut pool = self.images.lock().unwrap_or_else(|e| e.into_inner());
        let Some(pos) = pool.images.iter().position(|&p| p == image) else {
            return;
        };
        pool.images.swap_remove(pos);
        self.release(image);
    }

    /// Releases every tracked image.
    pub fn destroy_images(&self) {
        let mut pool = self.images.lock().unwrap_or_else(|e| e.into_inner());
        for image in pool.images.drain(..) {
            self.release(image);
        }
    }

    pub fn image_count(&self) -> usize {
        self.images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .images
            .len()
    }

    fn release(&self, image: *mut RawImage) {
        if let Err(err) = self
            .api
            .call(api::DESTROY_IMAGE, &mut [Arg::StructRef(image as *mut c_void)])
        {
            warn!(%err, "failed to destroy fc2 image");
        }
        // Safety: the pointer came out of acquire_image's Box::into_raw and
        // was just removed from the pool, so this is the sole owner.
        drop(unsafe { Box::from_raw(image) });
    }

    /// Number of cameras visible on the default context's bus.
    pub fn num_cameras(&self) -> Result<u32> {
        let ctx = self.context(0)?;
        let mut count = 0u32;
        self.api.call(
            api::GET_NUM_OF_CAMERAS,
            &mut [Arg::Ptr(ctx.0), Arg::OutU32(&mut count)],
        )?;
        Ok(count)
    }

    /// Number of devices (cameras plus other IIDC devices) on the bus.
    pub fn num_devices(&self) -> Result<u32> {
        let ctx = self.context(0)?;
        let mut count = 0u32;
        self.api.call(
            api::GET_NUM_OF_DEVICES,
            &mut [Arg::Ptr(ctx.0), Arg::OutU32(&mut count)],
        )?;
        Ok(count)
    }

    /// Serial number of the camera at a bus index.
    pub fn serial_number(&self, index: u32) -> Result<u32> {
        let ctx = self.context(0)?;
        let mut serial = 0u32;
        self.api.call(
            api::GET_CAMERA_SERIAL_NUMBER_FROM_INDEX,
            &mut [
                Arg::Ptr(ctx.0),
                Arg::Int(index as i64),
                Arg::OutU32(&mut serial),
            ],
        )?;
        Ok(serial)
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        // Images first: they may still reference context-owned buffers.
        self.destroy_images();
        self.dispose_contexts();
    }
}
