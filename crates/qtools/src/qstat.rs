//! Queue instance listing from `qstat -f -xml`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::QtoolsConfig;
use crate::error::QtoolsResult;
use crate::runner::{run_checked, CommandRunner};

/// One `Queue-List` entry: a queue on a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueInstance {
    pub name: String,
    pub qtype: String,
    pub slots_used: i32,
    pub slots_resv: i32,
    pub slots_total: i32,
    pub np_load_avg: f64,
    pub arch: String,
    /// Queue state letters (`d`, `u`, `a`, ...). Empty when the queue is fine.
    pub state: String,
}

#[derive(Debug, Default, Deserialize)]
struct JobInfo {
    #[serde(default)]
    queue_info: QueueInfo,
}

#[derive(Debug, Default, Deserialize)]
struct QueueInfo {
    #[serde(rename = "Queue-List", default)]
    queues: Vec<QueueInstance>,
}

/// Decode the document printed by `qstat -f -xml`.
pub fn parse_qstat_f(xml: &str) -> QtoolsResult<Vec<QueueInstance>> {
    let info: JobInfo = quick_xml::de::from_str(xml)?;
    Ok(info.queue_info.queues)
}

/// Run `qstat -f -q <queue_filter> -xml` and decode its queue instances.
pub async fn qstat_f(
    runner: &dyn CommandRunner,
    config: &QtoolsConfig,
    queue_filter: &str,
) -> QtoolsResult<Vec<QueueInstance>> {
    let program = config.command("qstat");
    let args = vec![
        "-f".to_string(),
        "-q".to_string(),
        queue_filter.to_string(),
        "-xml".to_string(),
    ];
    let output = run_checked(runner, &program, args).await?;

    let queues = parse_qstat_f(&output.stdout).inspect_err(|e| {
        warn!("Could not decode qstat -f -q {} -xml output: {}", queue_filter, e);
    })?;
    debug!("qstat returned {} queue instances", queues.len());
    Ok(queues)
}
