use anyhow::{Result, bail};
use bisara::assembler::AssemblyConfig;
use bisara::classify::classifier::{DisabledClassifier, SignClassifier};
use bisara::cli::{Cli, Commands};
use bisara::config::Config;
use bisara::detect::replay::ReplayScript;
use bisara::pipeline::orchestrator::{Pipeline, PipelineConfig};
use bisara::pipeline::sink::StdoutSink;
use bisara::speech::synthesizer::{NullSynthesizer, SpeechSynthesizer};
use bisara::vocab::Vocabulary;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            run_pipeline(config, &cli)?;
        }
        Some(Commands::Vocab) => {
            let config = load_config(cli.config.as_deref())?;
            print_vocabulary(&config)?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "bisara", &mut io::stdout());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    Ok(config.with_env_overrides())
}

fn print_vocabulary(config: &Config) -> Result<()> {
    let vocabulary = Vocabulary::from_words(config.vocabulary.words.clone())?;
    for (index, word) in vocabulary.iter() {
        if index == 0 {
            println!("{:>3}  {}  {}", index, word, "(no sign)".dimmed());
        } else {
            println!("{:>3}  {}", index, word);
        }
    }
    Ok(())
}

fn run_pipeline(mut config: Config, cli: &Cli) -> Result<()> {
    // CLI flags override config file values
    if let Some(model) = &cli.model {
        config.classifier.model = Some(model.clone());
    }
    if let Some(threshold) = cli.threshold {
        config.classifier.confidence_threshold = threshold;
    }
    if let Some(idle_ms) = cli.idle {
        config.assembly.idle_finalize_ms = idle_ms;
    }
    if cli.no_auto_speak {
        config.speech.auto_speak = false;
    }
    if let Some(voice_model) = &cli.voice_model {
        config.speech.voice_model = Some(voice_model.clone());
    }

    // Landmark input: a recording file, or JSONL piped on stdin. Live
    // camera capture needs an external detector wired in through the
    // library API.
    let script = if let Some(path) = &cli.landmarks {
        ReplayScript::load(path)?
    } else if !io::stdin().is_terminal() {
        ReplayScript::from_reader(io::stdin().lock())?
    } else {
        bail!(
            "no landmark input: pass --landmarks <recording.jsonl> or pipe a recording to stdin"
        );
    };

    if script.is_empty() {
        bail!("landmark recording contains no frames");
    }
    if !cli.quiet && cli.verbose >= 1 {
        eprintln!("bisara: replaying {} landmark frames", script.len());
    }

    let vocabulary = Arc::new(Vocabulary::from_words(config.vocabulary.words.clone())?);
    let classifier = build_classifier(&config, cli.quiet)?;
    let speech = build_synthesizer(&config, cli.quiet)?;

    let idle_finalize = Duration::from_millis(config.assembly.idle_finalize_ms);
    let pipeline_config = PipelineConfig {
        vocabulary,
        threshold: config.classifier.confidence_threshold,
        assembly: AssemblyConfig {
            idle_finalize,
            auto_speak: config.speech.auto_speak,
        },
        frame_interval: Duration::from_millis(config.video.frame_interval_ms),
        verbosity: cli.verbose,
        quiet: cli.quiet,
        ..Default::default()
    };

    let (source, detector) = script.into_pipeline_inputs();
    let handle = Pipeline::new(pipeline_config).start(
        Box::new(source),
        Box::new(detector),
        classifier,
        speech,
        Box::new(StdoutSink),
    )?;

    // Replay until the recording runs out, then give the trailing
    // sentence room to finalize and be delivered.
    while handle.is_running() && !handle.source_exhausted() {
        thread::sleep(Duration::from_millis(100));
    }
    thread::sleep(idle_finalize + Duration::from_millis(500));

    handle.stop();
    Ok(())
}

fn build_classifier(config: &Config, quiet: bool) -> Result<Arc<dyn SignClassifier>> {
    match &config.classifier.model {
        Some(model_path) => {
            #[cfg(feature = "onnx")]
            {
                let classifier = bisara::classify::onnx::OnnxClassifier::load(model_path)?;
                if !quiet {
                    eprintln!(
                        "bisara: loaded classifier {}",
                        classifier.model_name().green()
                    );
                }
                Ok(Arc::new(classifier))
            }
            #[cfg(not(feature = "onnx"))]
            {
                if !quiet {
                    eprintln!(
                        "bisara: {} — built without the 'onnx' feature, model {} ignored",
                        "recognition disabled".yellow(),
                        model_path.display()
                    );
                }
                Ok(Arc::new(DisabledClassifier))
            }
        }
        None => {
            if !quiet {
                eprintln!(
                    "bisara: {} — no classifier model configured",
                    "recognition disabled".yellow()
                );
            }
            Ok(Arc::new(DisabledClassifier))
        }
    }
}

fn build_synthesizer(config: &Config, quiet: bool) -> Result<Arc<dyn SpeechSynthesizer>> {
    match &config.speech.voice_model {
        Some(voice_path) => {
            #[cfg(feature = "tts")]
            {
                let synthesizer = bisara::speech::piper::PiperSynthesizer::load(voice_path)?;
                if !quiet {
                    eprintln!("bisara: loaded voice {}", synthesizer.voice_name().green());
                }
                Ok(Arc::new(synthesizer))
            }
            #[cfg(not(feature = "tts"))]
            {
                if !quiet {
                    eprintln!(
                        "bisara: {} — built without the 'tts' feature, voice {} ignored",
                        "speech disabled".yellow(),
                        voice_path.display()
                    );
                }
                Ok(Arc::new(NullSynthesizer::new()))
            }
        }
        None => Ok(Arc::new(NullSynthesizer::new())),
    }
}
