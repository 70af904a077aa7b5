use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use swagger_lint_utils::PrettyPrint;
use tree_sitter::Parser;

#[derive(ClapParser, Debug)]
#[command(version, about = "Print the tree-sitter syntax tree of a YAML or JSON document")]
struct Args {
    /// Document to parse, or stdin when omitted
    input: Option<PathBuf>,
    /// Parse as JSON instead of YAML
    #[arg(long)]
    json: bool,
    /// Include node text in the output
    #[arg(short, long)]
    text: bool,
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let input = read_input(args.input.as_ref())?;

    let json = args.json
        || args
            .input
            .as_ref()
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext == "json");

    let mut parser = Parser::new();
    if json {
        parser.set_language(&tree_sitter_json::LANGUAGE.into())?;
    } else {
        parser.set_language(&tree_sitter_yaml::LANGUAGE.into())?;
    }

    let tree = parser
        .parse(&input, None)
        .ok_or("tree-sitter returned no tree")?;

    let mut printer = tree.root_node().pretty_printer();
    if args.text {
        printer = printer.show_text();
    }
    print!("{}", printer.print(&input)?);

    Ok(())
}
