//! finfo CLI: XML -> Fast Infoset.

use clap::{Args, Parser, Subcommand, ValueEnum};
use finfo::decoder_tables::{Table, is_sentinel};
use finfo::vocabulary::{ExternalVocabulary, SerializerVocabulary};
use finfo::{CharacterEncodingScheme, EncoderConfig, Serializer};
use std::io::{BufRead, BufReader, IsTerminal, Write};
use std::process;

#[derive(Parser)]
#[command(name = "finfo", about = "XML -> Fast Infoset (ITU-T X.891) conversion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode XML to Fast Infoset
    Encode(EncodeArgs),
    /// Print a decoder dispatch table
    Table(TableArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Input file (- for stdin)
    #[arg(short, long)]
    input: String,

    /// Output file (optional; without -o auto-derived, -o - = stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Write the `<?xml encoding='finf'?>` declaration before the header
    #[arg(long)]
    xml_declaration: bool,

    /// UTF-16BE for literal attribute values and character chunks
    #[arg(long)]
    utf16: bool,

    #[arg(long)]
    ignore_comments: bool,

    #[arg(long)]
    ignore_pis: bool,

    #[arg(long)]
    ignore_dtd: bool,

    /// Drop whitespace-only text
    #[arg(long)]
    ignore_whitespace: bool,

    /// Attribute values up to this length are added to the vocabulary
    #[arg(long, default_value_t = finfo::encoder::DEFAULT_MAX_TABLE_STRING_SIZE)]
    max_attribute_value_size: usize,

    /// Character chunks up to this length are added to the vocabulary
    #[arg(long, default_value_t = finfo::encoder::DEFAULT_MAX_TABLE_STRING_SIZE)]
    max_chunk_size: usize,

    /// Announce an (empty) external vocabulary with this URI
    #[arg(long)]
    external_vocabulary: Option<String>,
}

impl EncodeArgs {
    fn to_config(&self) -> EncoderConfig {
        let mut config = EncoderConfig {
            xml_declaration: self.xml_declaration,
            ignore_comments: self.ignore_comments,
            ignore_processing_instructions: self.ignore_pis,
            ignore_dtd: self.ignore_dtd,
            ignore_whitespace_text_content: self.ignore_whitespace,
            ..EncoderConfig::default()
        }
        .attribute_value_size(0, self.max_attribute_value_size)
        .character_content_chunk_size(0, self.max_chunk_size);
        if self.utf16 {
            config = config.character_encoding_scheme(CharacterEncodingScheme::Utf16Be);
        }
        if let Some(uri) = &self.external_vocabulary {
            config = config.external_vocabulary(ExternalVocabulary::new(uri.as_str(), SerializerVocabulary::new()));
        }
        config
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TableName {
    Dii,
    Eii,
    Aii,
    Nistring,
    Istring,
    IstringPrefixNamespace,
    Utf8,
    Utf8Ncname,
}

impl From<TableName> for Table {
    fn from(name: TableName) -> Self {
        match name {
            TableName::Dii => Table::Dii,
            TableName::Eii => Table::Eii,
            TableName::Aii => Table::Aii,
            TableName::Nistring => Table::NiString,
            TableName::Istring => Table::IString,
            TableName::IstringPrefixNamespace => Table::IStringPrefixNamespace,
            TableName::Utf8 => Table::Utf8,
            TableName::Utf8Ncname => Table::Utf8NcName,
        }
    }
}

#[derive(Args)]
struct TableArgs {
    /// Table to print
    #[arg(value_enum)]
    table: TableName,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Encode(args) => run_encode(args),
        Command::Table(args) => run_table(args),
    }
}

fn run_encode(args: EncodeArgs) -> Result<(), String> {
    let output_path = match &args.output {
        Some(p) => p.clone(),
        None => derive_output_path(&args.input)?,
    };
    let config = args.to_config();
    let input = open_input(&args.input)?;

    write_to_output(&output_path, |writer| {
        let mut serializer = Serializer::new(writer, config);
        finfo::encode_xml(input, &mut serializer).map_err(|e| e.to_string())?;
        let mut writer = serializer.into_inner().map_err(|e| e.to_string())?;
        writer.flush().map_err(|e| format!("Schreibfehler: {e}"))
    })
}

fn run_table(args: TableArgs) -> Result<(), String> {
    let table = Table::from(args.table);
    let mut out = std::io::stdout().lock();
    let mut text = format!("{}\n", table.name());
    for row in 0..16u8 {
        text.push_str(&format!("{:X}x ", row));
        for col in 0..16u8 {
            let state = table.state((row << 4) | col);
            if is_sentinel(state) {
                text.push_str(" --");
            } else {
                text.push_str(&format!(" {state:2}"));
            }
        }
        text.push('\n');
    }
    out.write_all(text.as_bytes()).map_err(|e| format!("Schreibfehler (stdout): {e}"))
}

/// `foo.xml` -> `foo.finf`
fn derive_output_path(input: &str) -> Result<String, String> {
    if input == "-" {
        return Err("ohne -o braucht es eine Eingabedatei (nicht stdin)".into());
    }
    let path = std::path::Path::new(input);
    Ok(path.with_extension("finf").to_string_lossy().into_owned())
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, String> {
    if path == "-" {
        if std::io::stdin().is_terminal() {
            eprintln!("Lese von stdin (Ctrl+D zum Beenden)...");
        }
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let file = std::fs::File::open(path).map_err(|e| format!("Lesefehler '{}': {e}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Erstellt einen BufWriter fuer stdout oder eine Datei.
fn create_buf_writer(path: &str) -> Result<std::io::BufWriter<Box<dyn Write>>, String> {
    if path == "-" {
        Ok(std::io::BufWriter::new(Box::new(std::io::stdout())))
    } else {
        let file = std::fs::File::create(path).map_err(|e| format!("Schreibfehler: {e}"))?;
        Ok(std::io::BufWriter::new(Box::new(file)))
    }
}

/// Schreibt nach stdout ("-") oder atomar in eine Datei (tmp+rename).
fn write_to_output(
    output_path: &str,
    write_fn: impl FnOnce(std::io::BufWriter<Box<dyn Write>>) -> Result<(), String>,
) -> Result<(), String> {
    if output_path == "-" {
        return write_fn(create_buf_writer("-")?);
    }

    let tmp_path = format!("{output_path}.tmp");
    let writer = create_buf_writer(&tmp_path)?;
    if let Err(e) = write_fn(writer) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    std::fs::rename(&tmp_path, output_path).map_err(|e| format!("Rename-Fehler: {e}"))
}
