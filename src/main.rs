mod analyzer;
mod shell;

#[cfg(feature = "DEBUG_MODE")]
fn debug_scan() -> std::io::Result<()> {
    use crate::analyzer::types::SortKey;

    let cwd = std::env::current_dir()?;
    let report = analyzer::usage::aggregate(&cwd).map_err(std::io::Error::other)?;
    analyzer::report::write_report(&mut std::io::stdout(), &cwd, &report, SortKey::Size)?;
    Ok(())
}

fn main() -> std::io::Result<()> {
    #[cfg(debug_assertions)]
    {
        println!("--- WARNING ---");
        println!("DEV PROFILE : Running dev profile!");
        println!("if you are a normal user, consider running with --release\n\n\n");
    }

    #[cfg(feature = "DEBUG_MODE")]
    {
        println!("--- WARNING ---");
        println!("DEBUG MODE : One-shot scan of the current directory!");
        return debug_scan();
    }

    shell::run();
    Ok(())
}
