//! 通知演示程序
//! 不启动 HTTP 服务，直接经由代理调用每个场景，并打印每次触发的通知

use aop_showcase::aop::{EntrySource, Journal, Outcome};
use aop_showcase::app::simple::{self, service::SimpleApi};
use aop_showcase::infrastructure::{config::AppConfig, logger::Logger};

fn main() -> anyhow::Result<()> {
    // `--json` 时每条记录输出一行 JSON
    let json = std::env::args().any(|arg| arg == "--json");
    let config = AppConfig::load()?;
    Logger::init(&config.logging);

    let journal = Journal::new(config.journal.capacity);
    let service = simple::advised_service(journal.clone());

    println!("=== AOP 拦截演示 ===");
    println!();

    let scenarios: Vec<(&str, Box<dyn Fn() -> Outcome + '_>)> = vec![
        ("before / after", Box::new(|| service.do_something("User"))),
        ("around", Box::new(|| service.do_something_else())),
        ("after success", Box::new(|| service.return_success())),
        ("after failure", Box::new(|| service.throw_exception())),
        ("单个标记", Box::new(|| service.annotated_method())),
        ("第二个标记", Box::new(|| service.second_annotated_method())),
        ("两个标记", Box::new(|| service.third_annotated_method())),
        (
            "经由代理直接调用",
            Box::new(|| service.method_that_is_not_advised_if_called_from_within_the_service()),
        ),
        ("服务内部调用", Box::new(|| service.call_method_that_is_not_advised())),
    ];

    for (title, run) in scenarios {
        println!("--- {} ---", title);
        match run() {
            Ok(value) => println!("结果: {}", value),
            Err(e) => println!("异常: {}", e),
        }
        for entry in journal.drain() {
            if json {
                println!("{}", serde_json::to_string(&entry)?);
                continue;
            }
            let line = match &entry.source {
                EntrySource::Advice { rule, kind } => format!("  [{}] {}", kind, rule),
                EntrySource::Target => format!("  [target] {}", entry.operation),
            };
            match entry.detail {
                Some(detail) => println!("{} ({})", line, detail),
                None => println!("{}", line),
            }
        }
        println!();
    }

    println!("✅ 演示完成");
    Ok(())
}
