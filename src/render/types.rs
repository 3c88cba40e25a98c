use serde::{Deserialize, Serialize};

/// Body sent to `POST {render}/generate`.
#[derive(Serialize, Debug)]
pub struct RenderRequest<'a> {
    pub code: &'a str,
}

/// Body returned by `POST {render}/generate`.
///
/// Asynchronous renders return only `job_id`; synchronous ones return the
/// finished artifact instead.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RenderSubmission {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Snapshot of a render job, as reported by `GET {render}/status/{job_id}`.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    /// Rendering has started; `progress` is 0-100 when the service reports it.
    Processing { progress: Option<u8> },
    Completed {
        code: Option<String>,
        video_path: String,
        duration_seconds: Option<f64>,
    },
    Failed { details: Option<String> },
    /// A status string this client does not know. Treated as still running.
    Unknown(String),
}

impl JobStatus {
    /// `COMPLETED` and `FAILED` never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing { .. } => "PROCESSING",
            JobStatus::Completed { .. } => "COMPLETED",
            JobStatus::Failed { .. } => "FAILED",
            JobStatus::Unknown(status) => status,
        }
    }
}

/// Raw shape of a status body. Every field but `status` is optional.
#[derive(Deserialize, Debug)]
struct StatusBody {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    video_path: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    progress: Option<f64>,
}

impl From<StatusBody> for JobStatus {
    fn from(body: StatusBody) -> Self {
        match body.status.as_str() {
            "PENDING" => JobStatus::Pending,
            "PROCESSING" => JobStatus::Processing {
                progress: body.progress.map(|p| p.clamp(0.0, 100.0) as u8),
            },
            // A finished job without a video is a failed render.
            "COMPLETED" => match body.video_path.filter(|path| !path.is_empty()) {
                Some(video_path) => JobStatus::Completed {
                    code: body.code,
                    video_path,
                    duration_seconds: body.duration,
                },
                None => JobStatus::Failed { details: None },
            },
            "FAILED" => JobStatus::Failed {
                details: body.details,
            },
            _ => JobStatus::Unknown(body.status),
        }
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        StatusBody::deserialize(deserializer).map(JobStatus::from)
    }
}
