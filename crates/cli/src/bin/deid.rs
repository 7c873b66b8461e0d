use anyhow::Result;

fn main() -> Result<()> {
    deid_cli::main_entry()
}
