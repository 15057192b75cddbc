use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of a Grid Engine accounting file: one finished job, or one
/// task of a parallel job when per-task accounting is configured.
///
/// Fields are listed in column order. Columns missing from older file
/// versions keep their default (empty, 0, or the epoch).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountingRecord {
    pub qname: String,
    pub hostname: String,
    pub group_id: String,
    pub owner: String,
    pub job_name: String,
    pub job_number: String,
    pub account: String,
    pub posix_priority: i64,
    pub submission_time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub failed: i64,
    pub exit_status: i64,
    pub ru_wallclock: i64,
    pub ru_utime: i64,
    pub ru_stime: i64,
    pub ru_maxrss: i64,
    pub ru_ixrss: i64,
    pub ru_ismrss: i64,
    pub ru_idrss: i64,
    pub ru_isrss: i64,
    pub ru_minflt: i64,
    pub ru_majflt: i64,
    pub ru_nswap: i64,
    pub ru_inblock: i64,
    pub ru_oublock: i64,
    pub ru_msgsnd: i64,
    pub ru_msgrcv: i64,
    pub ru_nsignals: i64,
    pub ru_nvcsw: i64,
    pub ru_nivcsw: i64,
    pub project: String,
    pub department: String,
    pub granted_pe: String,
    pub slots: i64,
    pub task_number: i64,
    pub cpu: f64,
    pub mem: f64,
    pub io: f64,
    pub category: String,
    pub iow: f64,
    pub pe_task_id: i64,
    pub max_vmem: i64,
    pub ar_id: i64,
    pub ar_submission_time: DateTime<Utc>,
    pub job_class: String,
    pub qdel_info: String,
    pub max_rss: i64,
    pub max_pss: i64,
    pub submit_host: String,
    pub cwd: String,
    pub submit_cmd: String,
    /// Wallclock in seconds with millisecond fraction.
    pub wallclock: f64,
}
