//src/main.rs

use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use travel_backend::config::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .context("Falha ao inicializar o estado da aplicação.")?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let addr = app_state.config.bind_addr.clone();
    let app = travel_backend::app(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {addr}"))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    // O override de método fica por fora do Router, então o serviço é montado aqui
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .context("Erro no servidor Axum")?;

    Ok(())
}
