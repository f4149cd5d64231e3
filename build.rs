fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/grain_blend.proto");

    // The protobuf bindings are only needed by the gRPC server.
    if std::env::var_os("CARGO_FEATURE_SERVER").is_some() {
        tonic_build::compile_protos("proto/grain_blend.proto")?;
    }

    Ok(())
}
