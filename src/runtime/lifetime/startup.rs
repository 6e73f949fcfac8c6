use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::auth::entities::Role;
use crate::models::roster::entities::NewUser;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

// 演示花名册：两名学生、两名教师、一名校长
const DEMO_ROSTER: [(&str, Role); 5] = [
    ("student1", Role::Student),
    ("student2", Role::Student),
    ("teacher1", Role::Teacher),
    ("teacher2", Role::Teacher),
    ("principal", Role::Principal),
];

/// 通过注册表构造指定名称的缓存后端
async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' not found in registry", name);
        return None;
    };

    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 初始化演示花名册
/// 仅在数据库中没有任何用户时写入
pub(crate) async fn seed_roster(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping roster seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, seeding demo roster...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping roster seed", e);
            return;
        }
    }

    for (username, role) in DEMO_ROSTER {
        let user = match storage
            .create_user(NewUser::new(username, format!("{username}@localhost")))
            .await
        {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to create user {}: {}", username, e);
                return;
            }
        };

        match storage.create_role_member(role, user.id).await {
            Ok(member) => info!(
                "Seeded {} (user ID: {}, {} ID: {})",
                username, user.id, role, member.id
            ),
            Err(e) => {
                warn!("Failed to create {} record for {}: {}", role, username, e);
                return;
            }
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储与缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    if AppConfig::get().app.seed_demo_roster {
        seed_roster(&storage).await;
    }

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::memory_storage;

    #[tokio::test]
    async fn test_seed_roster_once() {
        let storage: Arc<dyn Storage> = memory_storage().await;

        seed_roster(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 5);

        let teachers = storage.list_teachers().await.unwrap();
        assert_eq!(teachers.len(), 2);

        let principal = storage.get_role_member(Role::Principal, 1).await.unwrap();
        assert_eq!(principal.map(|m| m.user_id), Some(5));

        // 已有用户时不再写入
        seed_roster(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 5);
    }
}
