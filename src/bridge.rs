//! Line protocol between the kiosk front-end and the triage session.
//!
//! Each line from the front-end is one command; each command produces exactly one reply line.
//! The bridge holds no state of its own beyond handles to the session and announcement queue.

use anyhow::{anyhow, bail, Context};
use std::str::FromStr;
use triage_core::{AnnouncementQueue, TriageSession, VitalSample};

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCommand {
    Start,
    Points(u32),
    Covid(usize),
    Vitals(f64, f64, f64),
    Score,
    Id,
    Assess,
    Publish,
    Finish(u64),
    Cards,
    Announce,
    Say(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Line(String),
    Quit,
}

fn arg<T: FromStr>(parts: &[&str], index: usize, name: &str) -> anyhow::Result<T> {
    let raw = parts
        .get(index)
        .ok_or_else(|| anyhow!("missing argument: {name}"))?;
    raw.parse::<T>().map_err(|_| anyhow!("invalid {name}: {raw}"))
}

impl FromStr for BridgeCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let parts: Vec<&str> = rest.split_whitespace().collect();

        let expect_args = |n: usize| -> anyhow::Result<()> {
            if parts.len() > n {
                bail!("too many arguments for '{verb}'");
            }
            Ok(())
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" => BridgeCommand::Start,
            "points" => BridgeCommand::Points(arg(&parts, 0, "points")?),
            "covid" => BridgeCommand::Covid(arg(&parts, 0, "checklist index")?),
            "vitals" => BridgeCommand::Vitals(
                arg(&parts, 0, "temperature")?,
                arg(&parts, 1, "blood pressure")?,
                arg(&parts, 2, "oxygen saturation")?,
            ),
            "score" => BridgeCommand::Score,
            "id" => BridgeCommand::Id,
            "assess" => BridgeCommand::Assess,
            "publish" => BridgeCommand::Publish,
            "finish" => BridgeCommand::Finish(arg(&parts, 0, "identifier")?),
            "cards" => BridgeCommand::Cards,
            "announce" => BridgeCommand::Announce,
            "say" => {
                let text = rest.trim();
                if text.is_empty() {
                    bail!("missing argument: text");
                }
                return Ok(BridgeCommand::Say(text.to_string()));
            }
            "quit" | "exit" => BridgeCommand::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command: {other}"),
        };

        let arity = match command {
            BridgeCommand::Points(_) | BridgeCommand::Covid(_) | BridgeCommand::Finish(_) => 1,
            BridgeCommand::Vitals(..) => 3,
            _ => 0,
        };
        expect_args(arity)?;

        Ok(command)
    }
}

fn queued(accepted: bool) -> String {
    if accepted { "ok" } else { "busy" }.to_string()
}

/// Adapter translating front-end commands into session calls.
#[derive(Clone)]
pub struct Bridge {
    session: TriageSession,
    announcer: AnnouncementQueue,
}

impl Bridge {
    pub fn new(session: TriageSession, announcer: AnnouncementQueue) -> Self {
        Self { session, announcer }
    }

    pub fn handle(&self, command: BridgeCommand) -> anyhow::Result<Reply> {
        let line = match command {
            BridgeCommand::Start => {
                let id = self.session.start_patient()?;
                format!("id {id}")
            }
            BridgeCommand::Points(points) => {
                self.session.add_questionnaire_points(points)?;
                "ok".to_string()
            }
            BridgeCommand::Covid(index) => {
                self.session.set_covid_flag(index)?;
                "ok".to_string()
            }
            BridgeCommand::Vitals(temperature, pressure, saturation) => {
                let sample = VitalSample::new(temperature, pressure, saturation)?;
                self.session.update_vitals(sample)?;
                "ok".to_string()
            }
            BridgeCommand::Score => format!("score {}", self.session.total_score()?),
            BridgeCommand::Id => format!("id {}", self.session.identifier()?),
            BridgeCommand::Assess => {
                let a = self.session.assessment()?;
                format!(
                    "assessment {} {} {} {} {}",
                    a.identifier,
                    a.total_score,
                    a.tier.color_hex(),
                    a.tier.color_name(),
                    a.tier.label()
                )
            }
            BridgeCommand::Publish => {
                let path = self
                    .session
                    .publish()
                    .context("failed to publish status card")?;
                format!("published {}", path.display())
            }
            BridgeCommand::Finish(id) => {
                if self.session.finish(id)? {
                    format!("finished {id}")
                } else {
                    format!("no card {id}")
                }
            }
            BridgeCommand::Cards => std::iter::once("cards".to_string())
                .chain(self.session.published_cards()?.iter().map(u64::to_string))
                .collect::<Vec<_>>()
                .join(" "),
            BridgeCommand::Announce => {
                let a = self.session.assessment()?;
                queued(self.announcer.announce(a.tier.announcement(a.identifier))?)
            }
            BridgeCommand::Say(text) => queued(self.announcer.announce(text)?),
            BridgeCommand::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Line(line))
    }

    /// Parses and runs one line, turning any failure into an `error` reply.
    pub fn handle_line(&self, line: &str) -> Reply {
        match line.parse::<BridgeCommand>().and_then(|cmd| self.handle(cmd)) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("bridge command failed: {:#}", e);
                Reply::Line(format!("error {e:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use triage_core::{CoreConfig, PressurePolicy, Speaker, Thresholds, TriageResult};

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<String>>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&self, text: &str) -> TriageResult<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn bridge(
        dir: &std::path::Path,
        speaker: Arc<RecordingSpeaker>,
    ) -> (Bridge, tokio::task::JoinHandle<()>) {
        let thresholds = Thresholds::new(38.0, 90.0, 60.0, 140.0).unwrap();
        let cfg =
            CoreConfig::new(thresholds, PressurePolicy::HighestWins, dir.to_path_buf()).unwrap();
        let (queue, worker) = AnnouncementQueue::spawn(speaker).unwrap();
        (Bridge::new(TriageSession::new(Arc::new(cfg)), queue), worker)
    }

    fn line(reply: Reply) -> String {
        match reply {
            Reply::Line(line) => line,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("start".parse::<BridgeCommand>().unwrap(), BridgeCommand::Start);
        assert_eq!(
            " POINTS 12 ".parse::<BridgeCommand>().unwrap(),
            BridgeCommand::Points(12)
        );
        assert_eq!(
            "vitals 39 120 95.5".parse::<BridgeCommand>().unwrap(),
            BridgeCommand::Vitals(39.0, 120.0, 95.5)
        );
        assert_eq!(
            "say Patient 3,  please wait".parse::<BridgeCommand>().unwrap(),
            BridgeCommand::Say("Patient 3,  please wait".into())
        );
        assert_eq!("exit".parse::<BridgeCommand>().unwrap(), BridgeCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_malformed_commands() {
        for bad in [
            "",
            "dance",
            "points",
            "points -3",
            "points many",
            "covid 1 2",
            "vitals 39 120",
            "say   ",
            "score now",
            "cards 1",
        ] {
            assert!(bad.parse::<BridgeCommand>().is_err(), "accepted {bad:?}");
        }
    }

    #[tokio::test]
    async fn test_bridge_drives_full_triage_cycle() {
        let temp = TempDir::new().unwrap();
        let speaker = Arc::new(RecordingSpeaker::default());
        let (bridge, worker) = bridge(temp.path(), speaker.clone());

        assert_eq!(line(bridge.handle_line("start")), "id 1");
        assert_eq!(line(bridge.handle_line("vitals 39 120 95")), "ok");
        assert_eq!(line(bridge.handle_line("score")), "score 10");
        assert_eq!(line(bridge.handle_line("points 25")), "ok");
        assert_eq!(line(bridge.handle_line("covid 4")), "ok");
        assert_eq!(
            line(bridge.handle_line("assess")),
            "assessment 1 35 #ff6f00 orange Very Urgent"
        );

        let published = line(bridge.handle_line("publish"));
        assert!(published.starts_with("published "));
        assert!(temp.path().join("1.json").is_file());

        assert_eq!(line(bridge.handle_line("announce")), "ok");
        assert_eq!(line(bridge.handle_line("finish 1")), "finished 1");
        assert_eq!(line(bridge.handle_line("finish 1")), "no card 1");
        assert_eq!(bridge.handle_line("quit"), Reply::Quit);

        drop(bridge);
        worker.await.unwrap();
        let spoken = speaker.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].contains("Very Urgent"));
    }

    #[tokio::test]
    async fn test_bridge_reports_errors_and_keeps_state() {
        let temp = TempDir::new().unwrap();
        let (bridge, _worker) = bridge(temp.path(), Arc::new(RecordingSpeaker::default()));

        bridge.handle_line("start");
        bridge.handle_line("points 4");

        let reply = line(bridge.handle_line("covid 9"));
        assert!(reply.starts_with("error"), "{reply}");
        assert!(reply.contains("out of range"), "{reply}");

        let reply = line(bridge.handle_line("vitals nan 120 95"));
        assert!(reply.starts_with("error"), "{reply}");

        assert_eq!(line(bridge.handle_line("score")), "score 4");
    }

    #[tokio::test]
    async fn test_bridge_lists_published_cards() {
        let temp = TempDir::new().unwrap();
        let (bridge, _worker) = bridge(temp.path(), Arc::new(RecordingSpeaker::default()));

        assert_eq!(line(bridge.handle_line("cards")), "cards");

        bridge.handle_line("start");
        bridge.handle_line("publish");
        bridge.handle_line("start");
        bridge.handle_line("start");
        bridge.handle_line("publish");
        assert_eq!(line(bridge.handle_line("cards")), "cards 1 3");

        bridge.handle_line("finish 1");
        assert_eq!(line(bridge.handle_line("cards")), "cards 3");
    }

    #[tokio::test]
    async fn test_bridge_start_advances_identifier() {
        let temp = TempDir::new().unwrap();
        let (bridge, _worker) = bridge(temp.path(), Arc::new(RecordingSpeaker::default()));

        assert_eq!(line(bridge.handle_line("id")), "id 0");
        bridge.handle_line("start");
        bridge.handle_line("start");
        assert_eq!(line(bridge.handle_line("id")), "id 2");
    }
}
