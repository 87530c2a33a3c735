fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    forcedeck_cui::run_with_args(&args)
}
