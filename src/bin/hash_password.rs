//! Prints the argon2 hash to put into `admin_password_hash`.
//!
//! Usage: `hash_password <password>` or pipe the password on stdin.

use std::io::{self, BufRead};

use portfolio_admin::auth::hash_password;

fn main() {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut line = String::new();
            if let Err(e) = io::stdin().lock().read_line(&mut line) {
                eprintln!("Failed to read password: {e}");
                std::process::exit(1);
            }
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        eprintln!("Password must not be empty");
        std::process::exit(1);
    }

    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("Failed to hash password: {e}");
            std::process::exit(1);
        }
    }
}
