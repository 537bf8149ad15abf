fn main() -> Result<(), Box<dyn std::error::Error>> {
    mibscope_cli::run()
}
