use std::io::{self, Read};
use std::path::PathBuf;

use gumdrop::Options;
use serde::Serialize;

use affixspell::speller::{DictSpeller, SpellerConfig, Suggestion};

trait OutputWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool);
    fn write_suggestions(&mut self, word: &str, suggestions: &[Suggestion]);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        println!(
            "Input: {}\t\t[{}]",
            &word,
            if is_correct { "CORRECT" } else { "INCORRECT" }
        );
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        for sugg in suggestions {
            println!("{}\t\t{}", sugg.value(), sugg.weight());
        }
        println!();
    }

    fn finish(&mut self) {}
}

#[derive(Serialize)]
struct SuggestionRequest {
    word: String,
    is_correct: bool,
    suggestions: Vec<Suggestion>,
}

struct JsonWriter {
    results: Vec<SuggestionRequest>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        self.results.push(SuggestionRequest {
            word: word.to_owned(),
            is_correct,
            suggestions: vec![],
        });
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        let i = self.results.len() - 1;
        self.results[i].suggestions = suggestions.to_vec();
    }

    fn finish(&mut self) {
        println!(
            "{}",
            serde_json::to_string_pretty(&self.results).expect("serialization failed")
        );
    }
}

fn run(
    speller: &DictSpeller,
    words: Vec<String>,
    writer: &mut dyn OutputWriter,
    is_suggesting: bool,
    is_always_suggesting: bool,
    suggest_cfg: &SpellerConfig,
) {
    for word in words {
        let is_correct = speller.is_correct(&word);
        writer.write_correction(&word, is_correct);

        if is_suggesting && (is_always_suggesting || !is_correct) {
            let suggestions = speller.suggest_with_config(&word, suggest_cfg);
            writer.write_suggestions(&word, &suggestions);
        }
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "check words and get suggestions for misspellings")]
    Suggest(SuggestArgs),

    #[options(help = "check words for correctness only")]
    Check(CheckArgs),
}

#[derive(Debug, Options)]
struct SuggestArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "affix file (.aff) to be used", required)]
    aff: PathBuf,

    #[options(help = "word list (.dic) to be used", required)]
    dic: PathBuf,

    #[options(short = "S", help = "always show suggestions even if word is correct")]
    always_suggest: bool,

    #[options(help = "maximum number of suggestions per word")]
    n_best: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be processed")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct CheckArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "affix file (.aff) to be used", required)]
    aff: PathBuf,

    #[options(help = "word list (.dic) to be used", required)]
    dic: PathBuf,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be processed")]
    inputs: Vec<String>,
}

fn load_speller(aff: &PathBuf, dic: &PathBuf) -> anyhow::Result<DictSpeller> {
    let aff_text = std::fs::read_to_string(aff)
        .map_err(|e| anyhow::anyhow!("could not read {}: {}", aff.display(), e))?;
    let dic_text = std::fs::read_to_string(dic)
        .map_err(|e| anyhow::anyhow!("could not read {}: {}", dic.display(), e))?;
    Ok(DictSpeller::from_texts(&aff_text, &dic_text))
}

fn words_or_stdin(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !inputs.is_empty() {
        return Ok(inputs);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer
        .split_whitespace()
        .map(|word| word.to_string())
        .collect())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        Some(Command::Suggest(args)) => {
            let speller = load_speller(&args.aff, &args.dic)?;
            let words = words_or_stdin(args.inputs)?;
            let mut config = SpellerConfig::default();
            if args.n_best.is_some() {
                config.n_best = args.n_best;
            }

            let mut writer: Box<dyn OutputWriter> = if args.use_json {
                Box::new(JsonWriter::new())
            } else {
                Box::new(StdoutWriter)
            };
            run(
                &speller,
                words,
                &mut *writer,
                true,
                args.always_suggest,
                &config,
            );
            writer.finish();
        }
        Some(Command::Check(args)) => {
            let speller = load_speller(&args.aff, &args.dic)?;
            let words = words_or_stdin(args.inputs)?;

            let mut writer: Box<dyn OutputWriter> = if args.use_json {
                Box::new(JsonWriter::new())
            } else {
                Box::new(StdoutWriter)
            };
            run(
                &speller,
                words,
                &mut *writer,
                false,
                false,
                &SpellerConfig::default(),
            );
            writer.finish();
        }
        None => {
            eprintln!("a command is required: suggest or check");
            std::process::exit(1);
        }
    }

    Ok(())
}
