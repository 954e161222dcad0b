//! Slack incoming-webhook payloads and delivery.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::WebhookUrl;
use crate::error::{BurnoutError, BurnoutResult};
use crate::report::{Report, Section};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlackMessage {
    Text { text: String },
    Blocks { blocks: Vec<Block> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
    Actions { elements: Vec<Element> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button { text: TextObject, url: String },
}

impl TextObject {
    fn plain(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: true,
        }
    }
}

fn mrkdwn_section(text: String) -> Block {
    Block::Section {
        text: TextObject::Mrkdwn { text },
    }
}

fn healthy_text(company_avg: f64) -> String {
    format!("🟢 Weekly Burnout Report: All teams healthy (Avg {company_avg:.1}%).")
}

impl SlackMessage {
    /// Healthy reports go out as a single text line, everything else as blocks.
    pub fn from_report(report: &Report) -> Self {
        if let [Section::HealthySummary { company_avg }] = report.sections() {
            return Self::Text {
                text: healthy_text(*company_avg),
            };
        }

        Self::Blocks {
            blocks: report.sections().iter().map(section_block).collect(),
        }
    }
}

fn section_block(section: &Section) -> Block {
    match section {
        Section::HealthySummary { company_avg } => mrkdwn_section(healthy_text(*company_avg)),
        Section::Header { title } => Block::Header {
            text: TextObject::plain(*title),
        },
        Section::CompanyBaseline { company_avg } => {
            mrkdwn_section(format!("*Company Average Burnout:* `{company_avg:.1}%`"))
        }
        Section::RiskyDepartments(risky) => {
            let lines: Vec<String> = risky
                .iter()
                .map(|dept| {
                    format!(
                        "*{}* — `{:.1}%` ({:+.1}% vs avg) {} {}",
                        dept.department,
                        dept.avg_score,
                        dept.delta_pct,
                        dept.level.badge(),
                        dept.level
                    )
                })
                .collect();
            mrkdwn_section(format!("*High-Risk Departments:*\n{}", lines.join("\n")))
        }
        Section::PrimaryDrivers(drivers) => {
            let lines: Vec<String> = drivers
                .iter()
                .map(|team| {
                    format!(
                        "*{} → {}*\n• Avg weekly hours: `{:.1}`\n• Overtime: `{:.1}h`",
                        team.department, team.sub_team, team.avg_hours, team.avg_overtime
                    )
                })
                .collect();
            mrkdwn_section(format!("*Primary Drivers:*\n{}", lines.join("\n")))
        }
        Section::IndividualImpact { impacted_count } => mrkdwn_section(format!(
            "*Individual Impact:*\n\
             • `{impacted_count}` contributors showing sustained overload\n\
             • Pattern indicates *systemic*, not individual, risk"
        )),
        Section::Recommendations(items) => {
            let bullets: Vec<String> = items.iter().map(|item| format!("• {item}")).collect();
            mrkdwn_section(format!("*Recommended Actions:*\n{}", bullets.join("\n")))
        }
        Section::CallToAction { label, url } => Block::Actions {
            elements: vec![Element::Button {
                text: TextObject::plain(*label),
                url: url.to_string(),
            }],
        },
    }
}

/// Delivery sink for a finished report.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn deliver(&self, message: &SlackMessage) -> BurnoutResult<()>;
}

pub struct SlackNotifier {
    client: reqwest::Client,
    url: WebhookUrl,
    timeout: Duration,
}

impl SlackNotifier {
    pub fn new(url: WebhookUrl, timeout: Duration) -> BurnoutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("burnout-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url,
            timeout,
        })
    }
}

impl Notifier for SlackNotifier {
    async fn deliver(&self, message: &SlackMessage) -> BurnoutResult<()> {
        debug!(timeout = ?self.timeout, "posting report to webhook");

        let response = self
            .client
            .post(self.url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(message)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    BurnoutError::DeliveryTimeout(self.timeout)
                } else {
                    BurnoutError::Http(err)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "webhook accepted report");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %body, "webhook rejected report");
        Err(BurnoutError::DeliveryFailed {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::config::Thresholds;
    use crate::report::build_report;
    use crate::risk::{classify, employee, score_employees};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn sample_report() -> Report {
        let scored = score_employees(&[
            employee("E1", "Engineering", "Backend", 60.0, 15.0, -2.0), // 100
            employee("E2", "Engineering", "Frontend", 45.0, 0.0, 1.0),  // 43
            employee("E3", "HR", "Payroll", 40.0, 0.0, 0.0),            // 40
        ]);
        let aggregates = aggregate(&scored).unwrap();
        let classification = classify(
            &aggregates.departments,
            aggregates.company_avg,
            &Thresholds::default(),
        );
        build_report(&classification, &aggregates, &scored)
    }

    #[test]
    fn at_risk_report_serializes_to_blocks() {
        let payload = serde_json::to_value(SlackMessage::from_report(&sample_report())).unwrap();

        assert_eq!(
            payload,
            json!({
                "blocks": [
                    {
                        "type": "header",
                        "text": {
                            "type": "plain_text",
                            "text": "📊 Weekly Burnout Intelligence Report",
                            "emoji": true
                        }
                    },
                    {
                        "type": "section",
                        "text": { "type": "mrkdwn", "text": "*Company Average Burnout:* `61.0%`" }
                    },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": "*High-Risk Departments:*\n*Engineering* — `71.5%` (+17.2% vs avg) 🟡 At Risk"
                        }
                    },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": "*Primary Drivers:*\n*Engineering → Backend*\n• Avg weekly hours: `60.0`\n• Overtime: `15.0h`\n*Engineering → Frontend*\n• Avg weekly hours: `45.0`\n• Overtime: `0.0h`"
                        }
                    },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": "*Individual Impact:*\n• `1` contributors showing sustained overload\n• Pattern indicates *systemic*, not individual, risk"
                        }
                    },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": "*Recommended Actions:*\n• Declare a meeting-free day this week\n• Rebalance sprint commitments\n• Review overtime & on-call rotations"
                        }
                    },
                    {
                        "type": "actions",
                        "elements": [
                            {
                                "type": "button",
                                "text": {
                                    "type": "plain_text",
                                    "text": "📈 View Tableau Evidence",
                                    "emoji": true
                                },
                                "url": crate::report::DASHBOARD_URL
                            }
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn healthy_report_serializes_to_text() {
        let scored = score_employees(&[employee("E1", "HR", "Payroll", 40.0, 0.0, 0.0)]);
        let aggregates = aggregate(&scored).unwrap();
        let report = build_report(&crate::risk::Classification::Healthy, &aggregates, &scored);

        let payload = serde_json::to_value(SlackMessage::from_report(&report)).unwrap();
        assert_eq!(
            payload,
            json!({ "text": "🟢 Weekly Burnout Report: All teams healthy (Avg 40.0%)." })
        );
    }

    /// Accepts one connection, captures the raw request, replies with `status_line`.
    async fn serve_once(status_line: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/services/T000/B000/XXXX", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);

                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let body = "ok";
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn delivers_json_to_webhook() {
        let (url, server) = serve_once("200 OK").await;
        let notifier = SlackNotifier::new(WebhookUrl::new(url), Duration::from_secs(5)).unwrap();
        let message = SlackMessage::Text {
            text: "hello".to_string(),
        };

        notifier.deliver(&message).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /services/T000/B000/XXXX"));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"text":"hello"}"#));
    }

    #[tokio::test]
    async fn non_success_status_is_delivery_failure() {
        let (url, server) = serve_once("500 Internal Server Error").await;
        let notifier = SlackNotifier::new(WebhookUrl::new(url), Duration::from_secs(5)).unwrap();

        let err = notifier
            .deliver(&SlackMessage::from_report(&sample_report()))
            .await
            .unwrap_err();

        match err {
            BurnoutError::DeliveryFailed { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "ok");
            }
            other => panic!("expected delivery failure, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn slow_webhook_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let notifier =
            SlackNotifier::new(WebhookUrl::new(url), Duration::from_millis(200)).unwrap();
        let err = notifier
            .deliver(&SlackMessage::Text {
                text: "late".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BurnoutError::DeliveryTimeout(_)));
        server.abort();
    }
}
