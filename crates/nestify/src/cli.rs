use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use nested_set::{DuplicatePolicy, EncodeOptions, DEFAULT_ROOT_LEFT, DEFAULT_START_LEVEL};

/// Parsed command-line options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    /// Input document; stdin when absent
    pub input: Option<PathBuf>,
    /// Parent forced onto the top-level nodes
    pub parent: Option<u64>,
    /// Level of the top-level nodes
    pub level: u32,
    /// Left boundary of the external root
    pub root_left: u64,
    /// Fail on repeated identifiers instead of overwriting
    pub reject_duplicates: bool,
    /// Check the encoded table before printing it
    pub validate: bool,
    /// Print single-line JSON
    pub compact: bool,
    /// Print usage and exit
    pub show_help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            input: None,
            parent: None,
            level: DEFAULT_START_LEVEL,
            root_left: DEFAULT_ROOT_LEFT,
            reject_duplicates: false,
            validate: false,
            compact: false,
            show_help: false,
        }
    }
}

impl CliOptions {
    /// Encoder settings for these options
    pub fn encode_options(&self) -> EncodeOptions {
        let mut options = EncodeOptions::default()
            .with_start_level(self.level)
            .with_root_left(self.root_left);
        if let Some(parent) = self.parent {
            options = options.with_parent(parent);
        }
        if self.reject_duplicates {
            options = options.with_duplicates(DuplicatePolicy::Reject);
        }
        options
    }
}

/// Parse arguments, skipping the program name
pub fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut options = CliOptions::default();
    let mut args = args
        .into_iter()
        .skip(1)
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| format!("argument is not valid UTF-8: {}", arg.to_string_lossy()))
        });

    while let Some(arg) = args.next() {
        let arg = arg?;
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };

        match flag.as_str() {
            "-h" | "--help" => options.show_help = true,
            "--reject-duplicates" => options.reject_duplicates = true,
            "--validate" => options.validate = true,
            "--compact" => options.compact = true,
            "--parent" => {
                let value = flag_value(&flag, inline, &mut args)?;
                options.parent = Some(parse_number(&flag, &value)?);
            }
            "--level" => {
                let value = flag_value(&flag, inline, &mut args)?;
                options.level = parse_number(&flag, &value)?;
            }
            "--root-left" => {
                let value = flag_value(&flag, inline, &mut args)?;
                options.root_left = parse_number(&flag, &value)?;
            }
            "-" => set_input(&mut options, &arg)?,
            other if other.starts_with('-') => return Err(format!("unknown option `{other}`")),
            _ => set_input(&mut options, &arg)?,
        }
    }

    Ok(options)
}

fn flag_value<I>(flag: &str, inline: Option<String>, args: &mut I) -> Result<String, String>
where
    I: Iterator<Item = Result<String, String>>,
{
    match inline {
        Some(value) => Ok(value),
        None => args
            .next()
            .transpose()?
            .ok_or_else(|| format!("`{flag}` expects a value")),
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("`{flag}` expects a non-negative integer, got `{value}`"))
}

fn set_input(options: &mut CliOptions, arg: &str) -> Result<(), String> {
    if options.input.is_some() {
        return Err(format!("unexpected extra argument `{arg}`"));
    }
    // "-" reads stdin, same as no argument
    if arg != "-" {
        options.input = Some(PathBuf::from(arg));
    }
    Ok(())
}

/// Write usage text
pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Usage: nestify [OPTIONS] [FILE]")?;
    writeln!(out)?;
    writeln!(
        out,
        "Encode a JSON array of nested nodes into nested-set rows (left, right, level, parent)."
    )?;
    writeln!(out, "Reads FILE, or stdin when FILE is absent or `-`.")?;
    writeln!(out)?;
    writeln!(out, "Options:")?;
    writeln!(
        out,
        "  --parent <ID>         Force the parent of top-level nodes (0 keeps declared parents)"
    )?;
    writeln!(
        out,
        "  --level <N>           Level of top-level nodes [default: {DEFAULT_START_LEVEL}]"
    )?;
    writeln!(
        out,
        "  --root-left <N>       Left boundary of the enclosing root [default: {DEFAULT_ROOT_LEFT}]"
    )?;
    writeln!(out, "  --reject-duplicates   Fail when an identifier occurs twice")?;
    writeln!(out, "  --validate            Check the nested-set invariants before printing")?;
    writeln!(out, "  --compact             Print single-line JSON")?;
    writeln!(out, "  -h, --help            Print this help")?;
    writeln!(out)?;
    writeln!(out, "Set RUST_LOG=debug for encoder diagnostics.")
}
