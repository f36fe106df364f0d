#![cfg(feature = "hit")]
//! Hardware-dependent tests, compiled only with the "hit" feature.
//!
//! These require the FlyCapture2 SDK installed at its default path and at
//! least one Point Grey camera on the bus. They are separated from the stub
//! tests to keep the default test run hardware-free.

use std::sync::Arc;

use flycapture2::{
    Camera, CameraId, Fc2Api, GrabOptions, NativeLibrary, PropertyKind, ResourceManager,
    SchemaRegistry,
};

fn manager() -> Arc<ResourceManager> {
    let lib = NativeLibrary::open_default()
        .expect("failed to load libflycapture-c.so - ensure the SDK is installed");
    let api = Fc2Api::bind(Arc::new(lib), Arc::new(SchemaRegistry::builtin()))
        .expect("failed to bind the FlyCapture2 entry points");
    Arc::new(ResourceManager::new(Arc::new(api)))
}

#[test]
fn test_bus_enumeration_with_hardware() {
    let mgr = manager();
    let cameras = mgr
        .num_cameras()
        .expect("failed to enumerate cameras - ensure a camera is connected");
    assert!(cameras > 0, "at least one camera should be on the bus");

    let serial = mgr.serial_number(0).expect("failed to read serial number");
    println!("camera 0 has serial number {}", serial);
}

#[test]
fn test_connect_and_read_properties_with_hardware() {
    let mgr = manager();
    let mut cam =
        Camera::new(mgr, CameraId::Index(0)).expect("failed to resolve the first camera");
    cam.connect().expect("failed to connect");
    assert!(cam.is_connected());

    let shutter = cam
        .property(PropertyKind::Shutter)
        .expect("failed to read shutter");
    assert!(shutter.present, "shutter should be a real property");
    println!("shutter: value_a={} abs={}", shutter.value_a, shutter.abs_value);
}

#[test]
fn test_grab_one_frame_with_hardware() {
    let mgr = manager();
    let mut cam =
        Camera::new(mgr, CameraId::Index(0)).expect("failed to resolve the first camera");
    let frame = cam
        .grab(&GrabOptions::default())
        .expect("failed to grab a frame");
    let (rows, cols, channels) = frame.data.dim();
    assert!(rows > 0 && cols > 0 && channels > 0);
    println!(
        "grabbed {}x{}x{} frame in {}",
        rows, cols, channels, frame.meta.format
    );
}
