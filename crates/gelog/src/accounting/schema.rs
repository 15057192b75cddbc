//! Column layout of the accounting file.
//!
//! [`SCHEMA`] lists every column in file order together with its semantic
//! type and the record field it fills. The decoder only walks this table;
//! the order of fields in [`AccountingRecord`] does not matter.

use chrono::{DateTime, Utc};

use super::record::AccountingRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int64,
    Float,
    Timestamp,
}

#[derive(Clone, Copy)]
pub enum Setter {
    Text(fn(&mut AccountingRecord, String)),
    Int64(fn(&mut AccountingRecord, i64)),
    Float(fn(&mut AccountingRecord, f64)),
    Timestamp(fn(&mut AccountingRecord, DateTime<Utc>)),
}

/// One column: accounting(5) name plus how to store it.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub setter: Setter,
}

impl FieldSpec {
    pub fn kind(&self) -> FieldKind {
        match self.setter {
            Setter::Text(_) => FieldKind::Text,
            Setter::Int64(_) => FieldKind::Int64,
            Setter::Float(_) => FieldKind::Float,
            Setter::Timestamp(_) => FieldKind::Timestamp,
        }
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

macro_rules! column {
    ($name:literal, $kind:ident, $field:ident) => {
        FieldSpec {
            name: $name,
            setter: Setter::$kind(|r, v| r.$field = v),
        }
    };
}

pub static SCHEMA: [FieldSpec; 53] = [
    column!("qname", Text, qname),
    column!("hostname", Text, hostname),
    column!("group", Text, group_id),
    column!("owner", Text, owner),
    column!("job_name", Text, job_name),
    column!("job_number", Text, job_number),
    column!("account", Text, account),
    column!("priority", Int64, posix_priority),
    column!("submission_time", Timestamp, submission_time),
    column!("start_time", Timestamp, start_time),
    column!("end_time", Timestamp, end_time),
    column!("failed", Int64, failed),
    column!("exit_status", Int64, exit_status),
    column!("ru_wallclock", Int64, ru_wallclock),
    column!("ru_utime", Int64, ru_utime),
    column!("ru_stime", Int64, ru_stime),
    column!("ru_maxrss", Int64, ru_maxrss),
    column!("ru_ixrss", Int64, ru_ixrss),
    column!("ru_ismrss", Int64, ru_ismrss),
    column!("ru_idrss", Int64, ru_idrss),
    column!("ru_isrss", Int64, ru_isrss),
    column!("ru_minflt", Int64, ru_minflt),
    column!("ru_majflt", Int64, ru_majflt),
    column!("ru_nswap", Int64, ru_nswap),
    column!("ru_inblock", Int64, ru_inblock),
    column!("ru_oublock", Int64, ru_oublock),
    column!("ru_msgsnd", Int64, ru_msgsnd),
    column!("ru_msgrcv", Int64, ru_msgrcv),
    column!("ru_nsignals", Int64, ru_nsignals),
    column!("ru_nvcsw", Int64, ru_nvcsw),
    column!("ru_nivcsw", Int64, ru_nivcsw),
    column!("project", Text, project),
    column!("department", Text, department),
    column!("granted_pe", Text, granted_pe),
    column!("slots", Int64, slots),
    column!("task_number", Int64, task_number),
    column!("cpu", Float, cpu),
    column!("mem", Float, mem),
    column!("io", Float, io),
    column!("category", Text, category),
    column!("iow", Float, iow),
    column!("pe_taskid", Int64, pe_task_id),
    column!("maxvmem", Int64, max_vmem),
    column!("arid", Int64, ar_id),
    column!("ar_submission_time", Timestamp, ar_submission_time),
    column!("job_class", Text, job_class),
    column!("qdel_info", Text, qdel_info),
    column!("maxrss", Int64, max_rss),
    column!("maxpss", Int64, max_pss),
    column!("submit_host", Text, submit_host),
    column!("cwd", Text, cwd),
    column!("submit_cmd", Text, submit_cmd),
    column!("wallclock", Float, wallclock),
];

pub fn column_index(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|spec| spec.name == name)
}
