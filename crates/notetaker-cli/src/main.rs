use anyhow::{Context, Result, bail};
use notetaker_config::Config;
use notetaker_engine::editing::Document;
use notetaker_engine::phrases::PhraseLink;
use notetaker_engine::session::NoteSession;
use std::{env, path::PathBuf, process};

#[derive(Debug)]
struct Args {
    note: PathBuf,
    code: Option<String>,
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <note-file> [--code CODE]")
}

fn parse_args(args: &[String]) -> Result<Args> {
    let program = args.first().map_or("notetaker-cli", String::as_str);
    let mut note = None;
    let mut code = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--code" => match rest.next() {
                Some(value) => code = Some(value.clone()),
                None => bail!("--code needs a value\n{}", usage(program)),
            },
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{}", usage(program)),
            path if note.is_none() => note = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument {extra}\n{}", usage(program)),
        }
    }

    let Some(note) = note else {
        bail!("{}", usage(program));
    };
    Ok(Args { note, code })
}

fn render(links: &[PhraseLink], code: Option<&str>) -> Vec<String> {
    links
        .iter()
        .filter(|link| code.is_none_or(|code| link.code == code))
        .map(ToString::to_string)
        .collect()
}

fn run(args: Args) -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            Config::default()
        }
    };

    let note_path = config.resolve_note(&args.note);
    log::info!("Reading note {}", note_path.display());
    let bytes = std::fs::read(&note_path)
        .with_context(|| format!("Failed to read note '{}'", note_path.display()))?;
    let document = Document::from_bytes(&bytes)
        .with_context(|| format!("Failed to load note '{}'", note_path.display()))?;

    let mut session = NoteSession::with_document(document, config.session_options());
    session
        .flush()
        .with_context(|| format!("Failed to index phrases in '{}'", note_path.display()))?;

    for line in render(session.phrases(), args.code.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let result = parse_args(&args).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_note_and_code() {
        let parsed = parse_args(&args(&["notetaker-cli", "today.md", "--code", "H1"])).unwrap();
        assert_eq!(parsed.note, PathBuf::from("today.md"));
        assert_eq!(parsed.code.as_deref(), Some("H1"));
    }

    #[test]
    fn test_parse_requires_note() {
        let err = parse_args(&args(&["notetaker-cli"])).unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_parse_rejects_dangling_code_flag() {
        assert!(parse_args(&args(&["notetaker-cli", "a.md", "--code"])).is_err());
        assert!(parse_args(&args(&["notetaker-cli", "a.md", "b.md"])).is_err());
    }

    #[test]
    fn test_render_filters_by_code() {
        let links = vec![
            PhraseLink::new(0, 0, 5, "a", "A"),
            PhraseLink::new(1, 2, 9, "cat", "C"),
        ];

        assert_eq!(render(&links, None), vec!["0:0-0:5 [a][A]", "1:2-1:9 [cat][C]"]);
        assert_eq!(render(&links, Some("C")), vec!["1:2-1:9 [cat][C]"]);
    }
}
