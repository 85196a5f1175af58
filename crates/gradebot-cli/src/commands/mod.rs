pub mod dispatch;
pub mod grade;
pub mod run;
pub mod serve;
pub mod whoami;
