use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Phase of one room's recording/upload pipeline.
///
/// This is a status label only. Transitions belong to the runner that owns
/// the job; nothing here restricts which state may follow which.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    Error,
    #[default]
    WaitingForLiveStart,
    LiveStarted,
    ProcessingRecords,
    UploadingToRemoteA,
    UploadingToRemoteB,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("unknown job state code: {0}")]
    UnknownState(i32),
    #[error("unknown job state name: {0}")]
    UnknownName(String),
}

impl JobState {
    pub const ALL: [JobState; 6] = [
        JobState::Error,
        JobState::WaitingForLiveStart,
        JobState::LiveStarted,
        JobState::ProcessingRecords,
        JobState::UploadingToRemoteA,
        JobState::UploadingToRemoteB,
    ];

    /// Stable numeric code, `-1` for [`JobState::Error`]
    pub fn code(&self) -> i32 {
        match self {
            JobState::Error => -1,
            JobState::WaitingForLiveStart => 0,
            JobState::LiveStarted => 1,
            JobState::ProcessingRecords => 2,
            JobState::UploadingToRemoteA => 3,
            JobState::UploadingToRemoteB => 4,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JobState::Error)
    }

    /// Label from the default (English) label set
    pub fn label(&self) -> &'static str {
        EnglishLabels.label(*self)
    }
}

impl TryFrom<i32> for JobState {
    type Error = StateError;

    fn try_from(code: i32) -> Result<Self, StateError> {
        JobState::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or(StateError::UnknownState(code))
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Error => write!(f, "Error"),
            JobState::WaitingForLiveStart => write!(f, "WaitingForLiveStart"),
            JobState::LiveStarted => write!(f, "LiveStarted"),
            JobState::ProcessingRecords => write!(f, "ProcessingRecords"),
            JobState::UploadingToRemoteA => write!(f, "UploadingToRemoteA"),
            JobState::UploadingToRemoteB => write!(f, "UploadingToRemoteB"),
        }
    }
}

impl FromStr for JobState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Error" => Ok(JobState::Error),
            "WaitingForLiveStart" => Ok(JobState::WaitingForLiveStart),
            "LiveStarted" => Ok(JobState::LiveStarted),
            "ProcessingRecords" => Ok(JobState::ProcessingRecords),
            "UploadingToRemoteA" => Ok(JobState::UploadingToRemoteA),
            "UploadingToRemoteB" => Ok(JobState::UploadingToRemoteB),
            _ => Err(StateError::UnknownName(s.to_string())),
        }
    }
}

/// Display strings for job states, swappable per locale
pub trait Labels {
    fn label(&self, state: JobState) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

impl Labels for EnglishLabels {
    fn label(&self, state: JobState) -> &'static str {
        match state {
            JobState::Error => "Error!",
            JobState::WaitingForLiveStart => "Waiting for live",
            JobState::LiveStarted => "Live started",
            JobState::ProcessingRecords => "Processing records",
            JobState::UploadingToRemoteA => "Uploading to Bilibili",
            JobState::UploadingToRemoteB => "Uploading to Baidu Netdisk",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChineseLabels;

impl Labels for ChineseLabels {
    fn label(&self, state: JobState) -> &'static str {
        match state {
            JobState::Error => "错误！",
            JobState::WaitingForLiveStart => "摸鱼中",
            JobState::LiveStarted => "开播了",
            JobState::ProcessingRecords => "正在处理视频",
            JobState::UploadingToRemoteA => "正在上传至Bilibili",
            JobState::UploadingToRemoteB => "正在上传至百度网盘",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn labels(&self) -> &'static dyn Labels {
        match self {
            Locale::En => &EnglishLabels,
            Locale::Zh => &ChineseLabels,
        }
    }
}

pub fn label_of(state: JobState) -> &'static str {
    state.label()
}

/// Label lookup by numeric code; codes outside the defined states fail.
pub fn label_of_code(code: i32) -> Result<&'static str, StateError> {
    JobState::try_from(code).map(label_of)
}
