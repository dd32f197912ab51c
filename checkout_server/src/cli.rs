use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 13] = [
        "RUST_LOG",
        "MTS_HOST",
        "MTS_PORT",
        "MTS_DATABASE_URL",
        "MTS_RETURN_URL",
        "MTS_CANCEL_URL",
        "MTS_NOTIFY_URL",
        "MTS_CURRENCY",
        "MTS_TAX_PERCENT",
        "MTS_SHIPPING_FEE_CENTS",
        "MTS_FREE_SHIPPING_THRESHOLD_CENTS",
        "MTS_CLEAR_CART_ON_CHECKOUT",
        "PAYHERE_MERCHANT_ID",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
