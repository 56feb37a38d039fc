//! Static journal corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of `journalctl --output=json`
//! lines. [`corpus_high_volume`] builds a large stream at test time for
//! throughput paths.

/// Records every decoder must accept.
pub const CORPUS_VALID: &[&str] = &[
    r#"{"MESSAGE":"Linux version 4.20.6-arch1-1-ARCH (builduser@heftig-32156) #1 SMP PREEMPT","PRIORITY":"5","__REALTIME_TIMESTAMP":"1549067421724300","_TRANSPORT":"kernel","SYSLOG_FACILITY":"0","SYSLOG_IDENTIFIER":"kernel","_HOSTNAME":"machine.nl","_BOOT_ID":"61c0e40c739f4f009c785cef13b46e17"}"#,
    r#"{"MESSAGE":"Started Session 3 of user root.","PRIORITY":"6","__REALTIME_TIMESTAMP":"1549067422000000","SYSLOG_IDENTIFIER":"systemd","_HOSTNAME":"machine.nl","_PID":"1","_UID":"0","_SYSTEMD_UNIT":"init.scope"}"#,
    r#"{"MESSAGE":"Accepted publickey for root from 10.0.0.1 port 51234 ssh2","PRIORITY":"6","__REALTIME_TIMESTAMP":"1549067423000000","SYSLOG_IDENTIFIER":"sshd","_COMM":"sshd","_HOSTNAME":"machine.nl","_PID":"812","_SYSTEMD_SESSION":"3"}"#,
    r#"{"MESSAGE":"2019/02/02 01:30:00 [error] 1234#0: *1 connect() failed","PRIORITY":"3","__REALTIME_TIMESTAMP":"1549067424000000","SYSLOG_IDENTIFIER":"nginx","_HOSTNAME":"web-1","_PID":"1234"}"#,
    r#"{"MESSAGE":"{\"Message\":\"actually something else\",\"FullMessage\":\"additional data\"}","PRIORITY":"6","__REALTIME_TIMESTAMP":"1549067425000000","SYSLOG_IDENTIFIER":"api","_HOSTNAME":"api-1"}"#,
    r#"{"MESSAGE":[116,104,105,115,32,105,115,32,97,32,98,105,110,97,114,121,32,118,97,108,117,101,32,7],"PRIORITY":"6","__REALTIME_TIMESTAMP":"1549067426000000","SYSLOG_IDENTIFIER":"tty","_HOSTNAME":"machine.nl"}"#,
    r#"{"MESSAGE":"no priority field at all","__REALTIME_TIMESTAMP":"1549067427000000","SYSLOG_IDENTIFIER":"app","_HOSTNAME":"machine.nl"}"#,
    r#"{"MESSAGE":"NOTICE: [pool www] child 42 exited","PRIORITY":"5","__REALTIME_TIMESTAMP":"1549067428000000","_COMM":"php-fpm","_HOSTNAME":"machine.nl"}"#,
];

/// Records every decoder must reject, without panicking.
pub const CORPUS_INVALID: &[&str] = &[
    "",
    "not json at all",
    "[1, 2, 3]",
    r#""just a string""#,
    r#"{"MESSAGE":"no timestamp","PRIORITY":"6"}"#,
    r#"{"MESSAGE":"bad priority","PRIORITY":"eleven","__REALTIME_TIMESTAMP":"1"}"#,
    r#"{"MESSAGE":"priority out of range","PRIORITY":"9","__REALTIME_TIMESTAMP":"1"}"#,
    r#"{"MESSAGE":"bad timestamp","PRIORITY":"6","__REALTIME_TIMESTAMP":"yesterday"}"#,
    r#"{"MESSAGE":[104,105,300],"PRIORITY":"6","__REALTIME_TIMESTAMP":"1"}"#,
    r#"{"MESSAGE":{"nested":true},"PRIORITY":"6","__REALTIME_TIMESTAMP":"1"}"#,
    r#"{"MESSAGE":"wrong host type","__REALTIME_TIMESTAMP":"1","_HOSTNAME":42}"#,
    r#"{"MESSAGE":"truncated","#,
];

/// A Java-style stack trace logged one line per record, the way a daemon
/// writing to stdout shows up in the journal. All lines share identifier,
/// severity and fall within the same-source window.
pub const CORPUS_STACK_TRACE: &[&str] = &[
    r#"{"MESSAGE":"Exception in thread \"main\" java.lang.NullPointerException","PRIORITY":"3","__REALTIME_TIMESTAMP":"1549067430000000","SYSLOG_IDENTIFIER":"jenkins","_HOSTNAME":"ci-1"}"#,
    r#"{"MESSAGE":"\tat com.example.App.handle(App.java:42)","PRIORITY":"3","__REALTIME_TIMESTAMP":"1549067430000100","SYSLOG_IDENTIFIER":"jenkins","_HOSTNAME":"ci-1"}"#,
    r#"{"MESSAGE":"\tat com.example.App.main(App.java:7)","PRIORITY":"3","__REALTIME_TIMESTAMP":"1549067430000200","SYSLOG_IDENTIFIER":"jenkins","_HOSTNAME":"ci-1"}"#,
];

/// `count` records alternating between two producers so nothing merges.
pub fn corpus_high_volume(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let identifier = if i % 2 == 0 { "api" } else { "worker" };
            format!(
                r#"{{"MESSAGE":"log line {i}","PRIORITY":"6","__REALTIME_TIMESTAMP":"{}","SYSLOG_IDENTIFIER":"{identifier}","_HOSTNAME":"machine.nl","_PID":"{}"}}"#,
                1_549_067_421_000_000i64 + (i as i64) * 1_000_000,
                1000 + i % 7,
            )
        })
        .collect()
}
