use crate::config::{ReactorConfig, SmsConfig};
use crate::reactor::Reactor;
use async_trait::async_trait;
use caseiro_ai::{AgentError, AgentSettings, HostedAgent};
use caseiro_notify::error::{NotifyError, Result as NotifyResult};
use caseiro_notify::{OutgoingSms, SmsChannel, SmsTransport};
use caseiro_storage::memory::MemoryObjectStore;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

struct FakeAgent {
    answer: Option<String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl FakeAgent {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            prompts: Mutex::default(),
        }
    }

    fn failing() -> Self {
        Self {
            answer: None,
            prompts: Mutex::default(),
        }
    }
}

#[async_trait]
impl HostedAgent for FakeAgent {
    fn provider(&self) -> &str {
        "fake"
    }

    fn agent_id(&self) -> &str {
        "QAYKR34TMW"
    }

    fn agent_alias_id(&self) -> &str {
        "TSTALIASID"
    }

    fn region(&self) -> &str {
        "us-east-1"
    }

    async fn invoke(&self, prompt: &str, session_id: &str) -> caseiro_ai::error::Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), session_id.to_string()));
        self.answer.clone().ok_or(AgentError::Invoke {
            provider: "fake",
            message: "throttled".into(),
        })
    }
}

#[derive(Default)]
struct RecordingSms {
    sent: Mutex<Vec<OutgoingSms>>,
    fail: bool,
}

#[async_trait]
impl SmsTransport for RecordingSms {
    async fn publish(&self, sms: &OutgoingSms) -> NotifyResult<Option<String>> {
        if self.fail {
            return Err(NotifyError::provider("SNS", "InvalidParameter: PhoneNumber"));
        }
        self.sent.lock().unwrap().push(sms.clone());
        Ok(Some("sms-1".into()))
    }

    fn transport_name(&self) -> &str {
        "recording"
    }
}

struct Harness {
    store: Arc<MemoryObjectStore>,
    agent: Arc<FakeAgent>,
    sms: Arc<RecordingSms>,
    reactor: Reactor,
}

fn config() -> ReactorConfig {
    ReactorConfig {
        agent: AgentSettings {
            agent_id: "QAYKR34TMW".into(),
            agent_alias_id: "TSTALIASID".into(),
            region: "us-east-1".into(),
        },
        sms: SmsConfig {
            sender_id: "CAISEIRO".into(),
            destination_number: "+351912345678".into(),
        },
        ..ReactorConfig::default()
    }
}

fn harness(agent: FakeAgent, sms: RecordingSms) -> Harness {
    let store = Arc::new(MemoryObjectStore::new());
    let agent = Arc::new(agent);
    let sms = Arc::new(sms);
    let config = config();
    let channel = SmsChannel::new(
        sms.clone(),
        &config.sms.sender_id,
        &config.sms.destination_number,
    );
    let reactor = Reactor::new(store.clone(), agent.clone(), channel, &config);
    Harness {
        store,
        agent,
        sms,
        reactor,
    }
}

fn s3_event(bucket: &str, key: &str) -> Value {
    json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": bucket },
                "object": { "key": key, "size": 8 }
            }
        }]
    })
}

#[tokio::test]
async fn writes_alert_and_sends_sms() {
    let h = harness(
        FakeAgent::answering("  High ammonia: ventilate now.\n"),
        RecordingSms::default(),
    );
    h.store
        .insert_at("aviario-metrics", "file_1.txt", "raw text", Utc::now());

    let resp = h.reactor.handle(&s3_event("aviario-metrics", "file_1.txt")).await;

    assert_eq!(resp.status_code, 200);
    let body = resp.body_json().unwrap();
    assert_eq!(body["message"], "Success");
    assert_eq!(body["output_s3"], "s3://alertas-caseiro/alerts/file_1.json");
    assert_eq!(body["preview"], "High ammonia: ventilate now.");

    let (prompt, session_id) = h.agent.prompts.lock().unwrap()[0].clone();
    assert_eq!(prompt, "raw text");

    let written = h.store.object("alertas-caseiro", "alerts/file_1.json").unwrap();
    assert_eq!(
        written.content_type.as_deref(),
        Some("application/json; charset=utf-8")
    );
    let doc: Value = serde_json::from_slice(&written.body).unwrap();
    assert_eq!(doc["alert"], "High ammonia: ventilate now.");
    assert_eq!(doc["source"], json!({ "bucket": "aviario-metrics", "key": "file_1.txt" }));
    assert_eq!(doc["agent"]["agentId"], "QAYKR34TMW");
    assert_eq!(doc["agent"]["agentAliasId"], "TSTALIASID");
    assert_eq!(doc["agent"]["region"], "us-east-1");
    assert_eq!(doc["agent"]["sessionId"], session_id.as_str());
    assert!(doc["generated_at"].as_str().unwrap().ends_with('Z'));
    // pretty-printed on disk
    assert!(String::from_utf8(written.body).unwrap().contains("\n  \"alert\""));

    let sent = h.sms.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "High ammonia: ventilate now.");
    assert_eq!(sent[0].phone_number, "+351912345678");
    assert_eq!(sent[0].sender_id, "CAISEIRO");
}

#[tokio::test]
async fn session_ids_are_fresh_per_invocation() {
    let h = harness(FakeAgent::answering("ok"), RecordingSms::default());
    h.store.insert_at("b", "a.txt", "x", Utc::now());

    h.reactor.handle(&s3_event("b", "a.txt")).await;
    h.reactor.handle(&s3_event("b", "a.txt")).await;

    let prompts = h.agent.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_ne!(prompts[0].1, prompts[1].1);
}

#[tokio::test]
async fn decoded_key_drives_read_and_output_name() {
    let h = harness(FakeAgent::answering("ok"), RecordingSms::default());
    h.store
        .insert_at("aviario-metrics", "sala 2/leitura final.csv", "t=31", Utc::now());

    let resp = h
        .reactor
        .handle(&s3_event("aviario-metrics", "sala+2/leitura+final.csv"))
        .await;

    assert_eq!(resp.status_code, 200);
    assert!(h
        .store
        .object("alertas-caseiro", "alerts/leitura final.json")
        .is_some());
}

#[tokio::test]
async fn missing_key_is_bad_request_without_reads() {
    let h = harness(FakeAgent::answering("ok"), RecordingSms::default());
    // any read would fail loudly
    h.store.fail_operation("GetObject");

    let resp = h
        .reactor
        .handle(&json!({ "Records": [{ "s3": { "bucket": { "name": "aviario-metrics" } } }] }))
        .await;

    assert_eq!(resp.status_code, 400);
    assert_eq!(
        resp.body_json().unwrap(),
        json!({
            "error": "Bad Request",
            "message": "Missing required parameter: Records[0].s3.object.key"
        })
    );
    assert!(h.agent.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn agent_failure_is_server_error_and_writes_nothing() {
    let h = harness(FakeAgent::failing(), RecordingSms::default());
    h.store
        .insert_at("aviario-metrics", "file_1.txt", "raw text", Utc::now());

    let resp = h.reactor.handle(&s3_event("aviario-metrics", "file_1.txt")).await;

    assert_eq!(resp.status_code, 500);
    let body = resp.body_json().unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["message"].as_str().unwrap().contains("throttled"));
    assert!(h.store.keys("alertas-caseiro").is_empty());
    assert!(h.sms.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_source_object_is_server_error() {
    let h = harness(FakeAgent::answering("ok"), RecordingSms::default());

    let resp = h.reactor.handle(&s3_event("aviario-metrics", "gone.txt")).await;

    assert_eq!(resp.status_code, 500);
    assert!(h.agent.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sms_failure_keeps_written_alert() {
    let h = harness(
        FakeAgent::answering("ventilate"),
        RecordingSms {
            fail: true,
            ..Default::default()
        },
    );
    h.store
        .insert_at("aviario-metrics", "file_1.txt", "raw text", Utc::now());

    let resp = h.reactor.handle(&s3_event("aviario-metrics", "file_1.txt")).await;

    assert_eq!(resp.status_code, 500);
    assert!(resp.body.contains("PhoneNumber"));
    assert!(h
        .store
        .object("alertas-caseiro", "alerts/file_1.json")
        .is_some());
}

#[tokio::test]
async fn preview_is_limited_to_300_characters() {
    let long = "é".repeat(400);
    let h = harness(FakeAgent::answering(&long), RecordingSms::default());
    h.store.insert_at("b", "x.txt", "raw", Utc::now());

    let resp = h.reactor.handle(&s3_event("b", "x.txt")).await;

    let body = resp.body_json().unwrap();
    assert_eq!(body["preview"].as_str().unwrap().chars().count(), 300);
    let doc: Value =
        serde_json::from_slice(&h.store.object("alertas-caseiro", "alerts/x.json").unwrap().body)
            .unwrap();
    assert_eq!(doc["alert"].as_str().unwrap().chars().count(), 400);
}

#[tokio::test]
async fn non_utf8_source_is_server_error_without_agent_call() {
    let h = harness(FakeAgent::answering("ok"), RecordingSms::default());
    h.store
        .insert_at("aviario-metrics", "dump.bin", vec![0x74, 0xff, 0xfe], Utc::now());

    let resp = h.reactor.handle(&s3_event("aviario-metrics", "dump.bin")).await;

    assert_eq!(resp.status_code, 500);
    assert!(resp
        .body_json()
        .unwrap()["message"]
        .as_str()
        .unwrap()
        .contains("dump.bin is not valid UTF-8"));
    assert!(h.agent.prompts.lock().unwrap().is_empty());
    assert!(h.store.keys("alertas-caseiro").is_empty());
}
