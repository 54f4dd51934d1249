//! curly: token dump tool for the curly tokenizer
//!
//! Prints the tokens of a document one per line, or as JSON.
//!
//! - curly page.html              # One token per line
//! - curly --loc page.html        # With line:column spans
//! - curly --json --html '<p>{{x}}</p>'
//! - curly --chunk-size 3 page.html  # Exercise the streaming path

use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use curly_html::{Token, TokenKind, Tokenizer, TokenizerOptions};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Dump the tokens of an HTML + {{expression}} document
#[derive(Parser, Debug)]
#[command(name = "curly")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Tokenize a file
    curly ./index.html

    # Tokenize an inline string with source spans
    curly --loc --html '<h1>{{title}}</h1>'

    # JSON output, options from a config file
    curly --json --config curly.json ./index.html

    # Feed the input two characters at a time
    curly --chunk-size 2 ./index.html

    # Log every state transition
    curly -vv --html '<p>'
"#)]
struct Cli {
    /// Path to the document to tokenize
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Tokenize this string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Print tokens as a JSON array
    #[arg(long)]
    json: bool,

    /// Attach line:column spans to tokens
    #[arg(long)]
    loc: bool,

    /// Load tokenizer options from a JSON file (flags take precedence)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Feed the input in chunks of this many characters
    #[arg(long, value_name = "N")]
    chunk_size: Option<NonZeroUsize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (name, source) = read_source(&cli)?;
    let options = load_options(&cli)?;
    let tokens = tokenize(&source, options, cli.chunk_size)
        .with_context(|| format!("failed to tokenize {name}"))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", render(token, !cli.no_color));
        }
    }
    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The input document and a name for it in error messages.
fn read_source(cli: &Cli) -> Result<(String, String)> {
    if let Some(ref html) = cli.html {
        return Ok(("--html input".to_string(), html.clone()));
    }
    let Some(ref path) = cli.path else {
        bail!("no input given; pass a FILE or --html");
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok((path.display().to_string(), source))
}

fn load_options(cli: &Cli) -> Result<TokenizerOptions> {
    let mut options = match cli.config {
        Some(ref path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => TokenizerOptions::default(),
    };
    if cli.loc {
        options = options.with_locations(true);
    }
    debug!(?options, "tokenizer options");
    Ok(options)
}

/// Tokenize `source`, whole or in chunks of `chunk_size` characters.
fn tokenize(
    source: &str,
    options: TokenizerOptions,
    chunk_size: Option<NonZeroUsize>,
) -> Result<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(options);
    let Some(size) = chunk_size else {
        return Ok(tokenizer.tokenize(source)?);
    };

    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    for chunk in chars.chunks(size.get()) {
        let chunk: String = chunk.iter().collect();
        tokens.extend(tokenizer.tokenize_part(&chunk)?);
    }
    tokens.extend(tokenizer.tokenize_eof());
    Ok(tokens)
}

fn render(token: &Token, color: bool) -> String {
    let text = token.kind.to_string();
    let text = if color { paint(&token.kind, &text) } else { text };
    let Some(loc) = token.loc else {
        return text;
    };
    // Pad before painting so escape codes don't count toward the width.
    let loc = loc.to_string();
    let loc = format!("{loc:<12}");
    if color {
        format!("{} {text}", loc.yellow())
    } else {
        format!("{loc} {text}")
    }
}

fn paint(kind: &TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Chars { .. } => text.green().to_string(),
        TokenKind::Comment { .. } => text.dimmed().to_string(),
        TokenKind::StartTag { .. } | TokenKind::EndTag { .. } => text.cyan().to_string(),
        TokenKind::StartExpression { .. } | TokenKind::EndExpression { .. } => {
            text.magenta().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunked_matches_whole() {
        let source = "<ul>\n{{#each xs}}<li>{{x}}</li>{{/each}}\n</ul>";
        let options = TokenizerOptions::default().with_locations(true);
        let whole = tokenize(source, options, None).unwrap();
        for size in 1..8 {
            let chunked = tokenize(source, options, NonZeroUsize::new(size)).unwrap();
            assert_eq!(chunked, whole, "chunk size {size}");
        }
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = tokenize("{{a}b}}", TokenizerOptions::default(), None).unwrap_err();
        assert!(err.to_string().contains("syntax error at line 1, column 5"));
    }

    #[test]
    fn test_render_without_color() {
        let tokens = tokenize(
            "<p>hi</p>",
            TokenizerOptions::default().with_locations(true),
            None,
        )
        .unwrap();
        assert_eq!(render(&tokens[0], false), "1:0-1:3      <p>");
        assert_eq!(render(&tokens[1], false), "1:3-1:5      Chars(\"hi\")");
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["curly", "--loc", "--chunk-size", "4", "-vv", "page.html"])
            .unwrap();
        assert!(cli.loc);
        assert_eq!(cli.chunk_size.map(NonZeroUsize::get), Some(4));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.path, Some(PathBuf::from("page.html")));

        let options = load_options(&cli).unwrap();
        assert!(options.track_locations);
    }

    #[test]
    fn test_html_conflicts_with_path() {
        assert!(Cli::try_parse_from(["curly", "--html", "<p>", "page.html"]).is_err());
        assert!(Cli::try_parse_from(["curly", "--chunk-size", "0", "--html", "x"]).is_err());
    }

    #[test]
    fn test_missing_input() {
        let cli = Cli::try_parse_from(["curly"]).unwrap();
        assert!(read_source(&cli).is_err());
    }
}
