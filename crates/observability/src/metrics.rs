//! 工作池指标记录
//!
//! 通过 `metrics` facade 上报，未安装 recorder 时为空操作。

use metrics::{counter, gauge, histogram};

/// 记录作业提交
pub fn record_job_submitted() {
    counter!("linepool_jobs_submitted_total").increment(1);
}

/// 记录作业完成 (成功/失败)
pub fn record_job_completed(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("linepool_jobs_completed_total", "outcome" => outcome).increment(1);
}

/// 记录单行写入耗时
pub fn record_append_latency_ms(sink_name: &str, latency_ms: f64) {
    histogram!(
        "linepool_append_latency_ms",
        "sink" => sink_name.to_string()
    )
    .record(latency_ms);
}

/// 记录活跃 worker 数
pub fn record_active_workers(count: usize) {
    gauge!("linepool_workers_active").set(count as f64);
}
