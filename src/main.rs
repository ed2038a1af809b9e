// 应用程序主入口函数
fn main() {
    if let Err(e) = maintenance_lib::run() {
        eprintln!("错误: {:#}", e);
        std::process::exit(1);
    }
}
