//! Build script
//!
//! Compiles the Secrets Store CSI driver provider protocol (`proto/provider/v1alpha1`)
//! into tonic server stubs. The generated code is included via `tonic::include_proto!`
//! in `src/server/grpc.rs`.
//!
//! `protoc` is vendored through `protoc-bin-vendored` so the build does not depend on a
//! system installation.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Point tonic-prost-build at the vendored protoc binary unless one was provided
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(&["proto/provider/v1alpha1/service.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/provider/v1alpha1/service.proto");

    Ok(())
}
