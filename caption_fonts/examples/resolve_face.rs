// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolve the face a caption renderer would use for a character.

use caption_fonts::{Context, ContextOptions, ProviderType, create_provider};
use clap::Parser;
use std::{process::ExitCode, sync::Arc};

#[derive(Parser, Debug)]
#[command(about = "Print the font face chosen for a caption character")]
struct Args {
    /// Font provider: auto, coretext, fontconfig or directwrite.
    #[arg(short, long, default_value = "auto", value_parser = clap::value_parser!(ProviderType))]
    provider: ProviderType,
    /// Character the face must cover.
    #[arg(short, long)]
    char: Option<char>,
    /// ISO 639-2 caption language, such as `jpn`.
    #[arg(short, long)]
    language: Option<String>,
    /// Log verbose provider messages.
    #[arg(short, long)]
    verbose: bool,
    /// Families to try in order. Defaults to the provider's list.
    families: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let families: Vec<&str> = args.families.iter().map(String::as_str).collect();

    let context = Arc::new(
        Context::new(ContextOptions {
            verbose: args.verbose,
            language: args.language,
        })
        .with_log_callback(|level, message| eprintln!("[{level:?}] {message}")),
    );

    let mut provider = match create_provider(args.provider, &context) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = provider.initialize() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    println!("provider: {}", provider.kind());
    println!("defaults: {}", provider.default_families().join(", "));
    match provider.resolve_face(&families, args.char) {
        Ok(face) => {
            let descriptor = face.descriptor();
            println!("family:   {}", descriptor.family_name());
            if let Some(name) = descriptor.postscript_name() {
                println!("name:     {name}");
            }
            if let Some(path) = descriptor.source().path() {
                println!("file:     {} #{}", path.display(), descriptor.index());
            }
            println!("weight:   {}", descriptor.weight());
            println!("style:    {}", descriptor.style());
            if let Some(ch) = args.char {
                println!("glyph:    {:?}", face.glyph_id(ch));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
