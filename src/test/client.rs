#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, TcpListener};
    use std::time::Duration;

    use rocket::Shutdown;
    use rocket::tokio::task::JoinHandle;

    use crate::init_rocket;
    use crate::models::{NewTeacher, TeacherChanges};
    use crate::test::test_utils::create_standard_test_db;
    use crate::ui::{ClientError, HttpApi, TeacherApi, TeacherPage};

    struct TestServer {
        base_url: String,
        shutdown: Shutdown,
        handle: JoinHandle<()>,
    }

    impl TestServer {
        async fn start() -> Self {
            let port = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
                .and_then(|listener| listener.local_addr())
                .map(|addr| addr.port())
                .expect("free port");

            let test_db = create_standard_test_db().await;
            let config = rocket::Config {
                port,
                address: Ipv4Addr::LOCALHOST.into(),
                ..rocket::Config::debug_default()
            };

            let rocket = init_rocket(test_db.pool)
                .await
                .configure(config)
                .ignite()
                .await
                .expect("rocket ignites");
            let shutdown = rocket.shutdown();
            let handle = rocket::tokio::spawn(async move {
                let _ = rocket.launch().await;
            });

            let base_url = format!("http://127.0.0.1:{}/api", port);
            let health = format!("{}/health", base_url);
            for _ in 0..50 {
                if let Ok(response) = reqwest::get(&health).await {
                    if response.status().is_success() {
                        break;
                    }
                }
                rocket::tokio::time::sleep(Duration::from_millis(50)).await;
            }

            Self {
                base_url,
                shutdown,
                handle,
            }
        }

        async fn stop(self) {
            self.shutdown.notify();
            let _ = self.handle.await;
        }
    }

    #[rocket::async_test]
    async fn test_http_api_round_trip() {
        let server = TestServer::start().await;
        let api = HttpApi::new(format!("{}/", server.base_url));

        let teachers = api.list_teachers().await.unwrap();
        assert_eq!(teachers.len(), 2);
        assert_eq!(teachers[0].subjects, vec!["Math", "Science"]);

        let subjects = api.available_subjects().await.unwrap();
        assert_eq!(subjects[0], "Math");

        let created = api
            .create_teacher(&NewTeacher {
                name: "Bob".to_string(),
                email: "b@x.com".to_string(),
                username: "bob".to_string(),
                password: "p".to_string(),
                phone: Some("555".to_string()),
                employee_id: Some("E1".to_string()),
                subject: "Math".to_string(),
                subjects: vec!["Math".to_string(), "Art".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(created.subject(), "Math");
        assert_eq!(created.subjects, vec!["Math", "Art"]);

        let changes = TeacherChanges {
            name: "Bob".to_string(),
            email: "b@x.com".to_string(),
            subject: "Art".to_string(),
            subjects: vec!["Art".to_string()],
            ..Default::default()
        };
        let updated = api.update_teacher(created.id, &changes).await.unwrap();
        assert_eq!(updated.map(|t| t.subjects), Some(vec!["Art".to_string()]));

        let missing = api.update_teacher(7777, &changes).await.unwrap();
        assert!(missing.is_none());

        api.delete_teacher(created.id).await.unwrap();
        api.delete_teacher(created.id).await.unwrap();

        server.stop().await;
    }

    #[rocket::async_test]
    async fn test_http_api_surfaces_error_message() {
        let server = TestServer::start().await;
        let api = HttpApi::new(server.base_url.clone());

        let err = api
            .create_teacher(&NewTeacher {
                name: "Nobody".to_string(),
                email: "nobody@x.com".to_string(),
                username: "nobody".to_string(),
                password: "pw".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to create teacher");
            }
            other => panic!("unexpected error: {}", other),
        }

        let mut page = TeacherPage::new(api);
        page.mount().await;
        assert_eq!(page.state().teachers().len(), 2);
        assert_eq!(page.state().available_subjects().len(), 9);

        server.stop().await;
    }
}
