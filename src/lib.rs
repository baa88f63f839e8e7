pub mod formatter;
pub mod process_command;
pub mod process_formatter;

mod cli;


pub fn main() {
    cli::cli().unwrap();
}
