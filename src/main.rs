fn main() -> gridsketch::Result<()> {
    // RUST_LOG controls verbosity
    env_logger::init();

    gridsketch::run_app()
}
