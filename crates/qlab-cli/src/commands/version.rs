//! `qlab version`.

use console::style;

const CRATES: [(&str, &str); 5] = [
    ("qlab-primitives", "random numbers and correlation"),
    ("qlab-compile", "transpiler passes for device gate sets"),
    ("qlab-adapter-sim", "statevector simulator"),
    ("qlab-adapter-ibm", "IBM Quantum client and least-busy selection"),
    ("qlab-dashboard", "web UI and hardware RNG endpoint"),
];

pub fn execute() {
    println!(
        "{} {}",
        style("qlab").cyan().bold(),
        style(env!("CARGO_PKG_VERSION")).yellow()
    );
    println!();
    for (name, purpose) in CRATES {
        println!("  {:<18}{}", style(name).bold(), purpose);
    }
    println!();
    println!("{}", style(env!("CARGO_PKG_LICENSE")).dim());
}
