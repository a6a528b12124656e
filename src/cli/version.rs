/// Display version information
pub fn execute() {
    println!("treasury {}", env!("CARGO_PKG_VERSION"));
    println!("Operator CLI for a deposit-weighted custody pool");
}
