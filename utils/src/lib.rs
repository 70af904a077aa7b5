pub mod node_print;

pub use node_print::{PrettyPrint, Printer};
