use serde::{Deserialize, Serialize};

/// Job status carried by every API response.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Failure,
    Incomplete,
    #[serde(other)]
    Unknown,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Message {
    #[serde(rename = "SOURCE", default)]
    pub source: String,
    #[serde(rename = "LVL", default)]
    pub level: String,
    #[serde(rename = "ERR_CD", default)]
    pub error_code: Option<String>,
    #[serde(rename = "INFO", default)]
    pub info: String,
}

/// Common envelope returned by every Dynect endpoint, including login.
#[derive(Deserialize, Debug)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub job_id: Option<u64>,
    pub status: JobStatus,
    #[serde(default)]
    pub msgs: Vec<Message>,
}

impl ResponseEnvelope {
    /// "LVL: INFO" of the first message, or a fallback when the server
    /// sent none.
    pub fn first_message(&self) -> String {
        self.msgs
            .first()
            .map(|m| format!("{}: {}", m.level, m.info))
            .unwrap_or_else(|| "no message in response".to_string())
    }
}

#[derive(Serialize)]
pub struct SessionRequest {
    pub customer_name: String,
    pub user_name: String,
    pub password: String,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Default)]
pub struct SessionData {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(default)]
    pub data: SessionData,
}

#[derive(Serialize)]
pub struct Rdata {
    pub address: String,
}

#[derive(Serialize)]
pub struct ARecord {
    pub rdata: Rdata,
    pub ttl: u32,
}

#[derive(Serialize)]
pub struct UpdateRecordRequest {
    #[serde(rename = "ARecords")]
    pub a_records: Vec<ARecord>,
}

impl UpdateRecordRequest {
    pub fn new(ip: &str, ttl: u32) -> Self {
        Self {
            a_records: vec![ARecord {
                rdata: Rdata {
                    address: ip.to_string(),
                },
                ttl,
            }],
        }
    }
}

#[derive(Serialize)]
pub struct PublishRequest {
    pub publish: String,
}

impl PublishRequest {
    pub fn new() -> Self {
        Self {
            publish: "True".to_string(),
        }
    }
}
