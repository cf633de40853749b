//! paramsift engine
//!
//! Runs the per-URL pipeline: signature, narrowing, validation.

use crate::core::context::Config;
use crate::error::{Error, Result, SkipReason};
use crate::http::client::Probe;
use crate::payload::group::populate;
use crate::reporting;
use crate::scanner::heuristic::{heuristic, prioritize};
use crate::scanner::narrower::isolate;
use crate::validation::baseline::define_signature;
use crate::validation::verdict::{ConfirmedParameter, Validator};
use futures::FutureExt;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use url::Url;

/// Terminal state of one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    Skipped(SkipReason),
    Done(Vec<ConfirmedParameter>),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub skipped: usize,
    pub with_params: usize,
}

pub struct Engine<'a> {
    config: &'a Config,
    prober: &'a dyn Probe,
    wordlist: &'a [String],
    kill: Arc<AtomicBool>,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a Config, prober: &'a dyn Probe, wordlist: &'a [String]) -> Self {
        Self {
            config,
            prober,
            wordlist,
            kill: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting this flag stops narrowing for the URL currently being processed.
    pub fn kill_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.kill)
    }

    /// Read URLs line by line from `input` and write one record per URL with
    /// confirmed parameters to `out`. Only I/O failures on the streams end
    /// the run early.
    pub async fn run<R, W>(&self, mut input: R, out: &mut W) -> std::io::Result<RunStats>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut stats = RunStats::default();
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            line_no += 1;

            let Ok(text) = std::str::from_utf8(&buf) else {
                tracing::warn!("Skipped input line {}: not valid UTF-8", line_no);
                stats.processed += 1;
                stats.skipped += 1;
                continue;
            };
            let line = text.trim();
            if line.is_empty() {
                continue;
            }

            tracing::info!("Processing URL: {}", line);
            stats.processed += 1;

            match self.process(line).await {
                UrlOutcome::Skipped(reason) => {
                    tracing::info!("Skipped {}: {}", line, reason);
                    stats.skipped += 1;
                }
                UrlOutcome::Done(confirmed) if confirmed.is_empty() => {
                    tracing::info!("No parameters found for: {}", line);
                }
                UrlOutcome::Done(confirmed) => {
                    stats.with_params += 1;
                    self.emit(line, &confirmed, out)?;
                }
            }
        }

        tracing::info!(
            "Parameter hunting completed: {} processed, {} skipped, {} with parameters",
            stats.processed,
            stats.skipped,
            stats.with_params
        );
        Ok(stats)
    }

    /// Run the pipeline for one input line. Never fails: every error, panics
    /// included, becomes [`UrlOutcome::Skipped`].
    pub async fn process(&self, line: &str) -> UrlOutcome {
        match AssertUnwindSafe(self.scan(line)).catch_unwind().await {
            Ok(Ok(confirmed)) => UrlOutcome::Done(confirmed),
            Ok(Err(Error::SkippedTarget { reason, .. })) => UrlOutcome::Skipped(reason),
            Ok(Err(e)) => UrlOutcome::Skipped(SkipReason::Internal(e.to_string())),
            Err(_) => {
                tracing::warn!("Error processing URL {}: internal panic", line);
                UrlOutcome::Skipped(SkipReason::Internal("panic".to_string()))
            }
        }
    }

    async fn scan(&self, line: &str) -> Result<Vec<ConfirmedParameter>> {
        let url = parse_target(line)?;
        self.kill.store(false, Ordering::Relaxed);

        let signature = define_signature(self.prober, &url)
            .await
            .ok_or_else(|| Error::SkippedTarget {
                url: line.to_string(),
                reason: SkipReason::SignatureUndefined,
            })?;

        let found = heuristic(&signature.baseline_body, self.wordlist);
        if !found.is_empty() {
            tracing::info!("Heuristic found parameters: {:?}", found);
        }

        let candidates = populate(&prioritize(self.wordlist, &found));
        let groups = candidates.partition(self.config.chunks);

        let suspects = isolate(
            self.prober,
            &url,
            &signature,
            groups,
            self.config.max_rounds,
            &self.kill,
        )
        .await;

        if suspects.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!("Suspected parameters: {:?}", suspects.names().collect::<Vec<_>>());

        let validator = Validator::new(self.prober, &signature);
        let mut confirmed = Vec::new();
        for (name, value) in suspects.iter() {
            if let Some(check) = validator.validate(&url, name, value).await {
                confirmed.push(ConfirmedParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                    confirmed_by: check,
                });
            }
        }

        tracing::info!(
            "Confirmed parameters: {:?}",
            confirmed.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );
        Ok(confirmed)
    }

    fn emit<W: Write>(&self, line: &str, confirmed: &[ConfirmedParameter], out: &mut W) -> std::io::Result<()> {
        let Ok(url) = Url::parse(line) else {
            return Ok(());
        };

        match reporting::render(self.config.format, &url, confirmed) {
            Ok(record) => {
                writeln!(out, "{}", record)?;
                out.flush()
            }
            Err(e) => {
                tracing::warn!("Unable to render result for {}: {}", line, e);
                Ok(())
            }
        }
    }
}

/// What an interrupt should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Stop narrowing the current URL and carry on with the next one.
    AbandonUrl,
    /// The previous interrupt has not been consumed by a new URL yet.
    Exit,
}

/// Raise the kill flag. A second interrupt before the next URL starts asks
/// for the process to exit.
pub fn interrupt(kill: &AtomicBool) -> Interrupt {
    if kill.swap(true, Ordering::Relaxed) {
        Interrupt::Exit
    } else {
        Interrupt::AbandonUrl
    }
}

/// Accept only absolute http(s) URLs.
pub fn parse_target(line: &str) -> Result<Url> {
    let skipped = || Error::SkippedTarget {
        url: line.to_string(),
        reason: SkipReason::NotAUrl,
    };

    if !(line.starts_with("http://") || line.starts_with("https://")) {
        return Err(skipped());
    }

    Url::parse(line).map_err(|_| skipped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::OutputFormat;
    use crate::http::mock::{ok, reflecting, MockTarget};
    use crate::http::response::ProbeResult;
    use crate::payload::group::ParamSet;
    use crate::validation::verdict::Check;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn config(chunks: usize) -> Config {
        Config {
            chunks,
            format: OutputFormat::Url,
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_target() {
        assert!(parse_target("https://example.com/a?b=1").is_ok());
        assert!(matches!(
            parse_target("example.com/a"),
            Err(Error::SkippedTarget { reason: SkipReason::NotAUrl, .. })
        ));
        assert!(parse_target("ftp://example.com/").is_err());
        assert!(parse_target("http://").is_err());
    }

    #[tokio::test]
    async fn test_reflected_parameter_is_confirmed() {
        let target = MockTarget::new(reflecting(&["c"]));
        let config = config(2);
        let wordlist = words(&["a", "b", "c", "d"]);
        let engine = Engine::new(&config, &target, &wordlist);

        let outcome = engine.process("http://shop.test/catalog").await;
        let UrlOutcome::Done(confirmed) = outcome else {
            panic!("unexpected outcome {:?}", outcome);
        };
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].name, "c");
        assert_eq!(confirmed[0].confirmed_by, Check::ResponseDiff);
    }

    #[tokio::test]
    async fn test_unprobeable_target_is_skipped() {
        let target = MockTarget::new(|_: &ParamSet| ProbeResult::NetworkError("dns".into()));
        let config = config(2);
        let wordlist = words(&["x", "y"]);
        let engine = Engine::new(&config, &target, &wordlist);

        let outcome = engine.process("http://down.test/").await;
        assert_eq!(outcome, UrlOutcome::Skipped(SkipReason::SignatureUndefined));
        assert_eq!(target.hits(), 2);
    }

    #[tokio::test]
    async fn test_non_url_line_sends_nothing() {
        let target = MockTarget::new(|_: &ParamSet| ok("page"));
        let config = config(2);
        let wordlist = words(&["x"]);
        let engine = Engine::new(&config, &target, &wordlist);

        assert_eq!(engine.process("not a url").await, UrlOutcome::Skipped(SkipReason::NotAUrl));
        assert_eq!(target.hits(), 0);
    }

    #[tokio::test]
    async fn test_panicking_target_is_skipped() {
        let target = MockTarget::new(|p: &ParamSet| {
            if p.get("boom").is_some() {
                panic!("target exploded");
            }
            ok("page")
        });
        let config = config(1);
        let wordlist = words(&["boom"]);
        let engine = Engine::new(&config, &target, &wordlist);

        let outcome = engine.process("http://fragile.test/").await;
        assert!(matches!(outcome, UrlOutcome::Skipped(SkipReason::Internal(_))));
    }

    #[tokio::test]
    async fn test_run_writes_only_confirmed_urls() {
        let target = MockTarget::new(reflecting(&["c"]));
        let config = config(2);
        let wordlist = words(&["a", "b", "c", "d"]);
        let engine = Engine::new(&config, &target, &wordlist);

        let input: &[u8] = b"http://shop.test/catalog\n\nnot-a-url\n";
        let mut out = Vec::new();
        let stats = engine.run(input, &mut out).await.unwrap();

        assert_eq!(stats, RunStats { processed: 2, skipped: 1, with_params: 1 });
        assert_eq!(String::from_utf8(out).unwrap(), "http://shop.test/catalog?c=700002\n");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_the_run() {
        let target = MockTarget::new(reflecting(&["c"]));
        let config = config(2);
        let wordlist = words(&["a", "b", "c", "d"]);
        let engine = Engine::new(&config, &target, &wordlist);

        let input: &[u8] = b"http://bad.test/\xff\xfe\nhttp://shop.test/catalog\n";
        let mut out = Vec::new();
        let stats = engine.run(input, &mut out).await.unwrap();

        assert_eq!(stats, RunStats { processed: 2, skipped: 1, with_params: 1 });
        assert_eq!(String::from_utf8(out).unwrap(), "http://shop.test/catalog?c=700002\n");
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_read() {
        let target = MockTarget::new(reflecting(&["c"]));
        let config = config(2);
        let wordlist = words(&["a", "b", "c", "d"]);
        let engine = Engine::new(&config, &target, &wordlist);

        let mut out = Vec::new();
        let input: &[u8] = b"http://shop.test/catalog\r\n\nhttp://shop.test/other";
        let stats = engine.run(input, &mut out).await.unwrap();
        assert_eq!(stats.with_params, 2);
    }

    #[test]
    fn test_second_interrupt_asks_to_exit() {
        let kill = AtomicBool::new(false);
        assert_eq!(interrupt(&kill), Interrupt::AbandonUrl);
        assert!(kill.load(Ordering::Relaxed));
        assert_eq!(interrupt(&kill), Interrupt::Exit);

        kill.store(false, Ordering::Relaxed);
        assert_eq!(interrupt(&kill), Interrupt::AbandonUrl);
    }

    #[tokio::test]
    async fn test_kill_flag_is_cleared_per_url() {
        let target = MockTarget::new(reflecting(&["c"]));
        let config = config(2);
        let wordlist = words(&["a", "b", "c", "d"]);
        let engine = Engine::new(&config, &target, &wordlist);

        engine.kill_switch().store(true, Ordering::Relaxed);
        let outcome = engine.process("http://shop.test/catalog").await;
        assert!(matches!(outcome, UrlOutcome::Done(ref c) if c.len() == 1));
    }
}
