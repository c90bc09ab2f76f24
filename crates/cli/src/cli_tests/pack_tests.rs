// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_pack_new() {
    let cli = parse(&["phonix", "pack", "new", "Digraphs", "ship", "chat"]).unwrap();
    match cli.command {
        Command::Pack(PackCommand::New { name, words }) => {
            assert_eq!(name, "Digraphs");
            assert_eq!(words, vec!["ship", "chat"]);
        }
        _ => panic!("Expected pack new"),
    }
}

#[test]
fn test_pack_new_requires_words() {
    assert!(parse(&["phonix", "pack", "new", "Digraphs"]).is_err());
    assert!(parse(&["phonix", "pack", "new", "  ", "ship"]).is_err());
}

#[test]
fn test_pack_edit_words_are_comma_separated() {
    let cli = parse(&["phonix", "pack", "edit", "C1", "--words", "thin,that"]).unwrap();
    match cli.command {
        Command::Pack(PackCommand::Edit { id, name, words }) => {
            assert_eq!(id, PackId::custom(1));
            assert!(name.is_none());
            assert_eq!(words, Some(vec!["thin".to_string(), "that".to_string()]));
        }
        _ => panic!("Expected pack edit"),
    }
}

#[test]
fn test_pack_delete_and_list() {
    let cli = parse(&["phonix", "pack", "delete", "C3"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Pack(PackCommand::Delete { ref id }) if *id == PackId::custom(3)
    ));

    let cli = parse(&["phonix", "pack", "list", "-o", "json"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Pack(PackCommand::List { output }) if output.output == OutputFormat::Json
    ));
}
