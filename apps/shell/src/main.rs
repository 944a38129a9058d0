#[tokio::main]
async fn main() -> anyhow::Result<()> {
    qa_shell::run().await
}
