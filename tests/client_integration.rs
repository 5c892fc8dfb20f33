// FanboxClient against a local stub server: headers, pagination, and status mapping.
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use fanbox::ErrorKind;
use fanbox::api::{FanboxClient, browsable_posts};
use serde_json::json;

struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Serves every connection with `route(base_url, request_target)`.
    fn start<F>(route: F) -> Self
    where
        F: Fn(&str, &str) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base_url = format!("http://{}/", listener.local_addr().expect("addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let base = base_url.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle(stream, &base, &route, &seen);
            }
        });
        Self { base_url, requests }
    }

    fn client(&self) -> FanboxClient {
        FanboxClient::new("abc_123")
            .expect("client")
            .with_base_url(&self.base_url)
            .expect("base url")
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

fn handle<F>(stream: TcpStream, base: &str, route: &F, seen: &Mutex<Vec<String>>)
where
    F: Fn(&str, &str) -> (u16, String),
{
    let mut reader = BufReader::new(stream.try_clone().expect("clone"));
    let mut head = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        head.push_str(&line);
    }
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().expect("lock").push(head);

    let (status, body) = route(base, &target);
    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[test]
fn requests_carry_session_cookie_and_origin() {
    let server = StubServer::start(|_, _| (200, json!({"body": 0}).to_string()));
    server.client().verify_session().expect("session ok");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let head = requests[0].to_ascii_lowercase();
    assert!(head.starts_with("get /user.countunreadmessages "));
    assert!(head.contains("cookie: fanboxsessid=abc_123"));
    assert!(head.contains("origin: https://www.fanbox.cc"));
    assert!(head.contains("accept: application/json"));
}

#[test]
fn rejected_session_is_permission_error() {
    let server = StubServer::start(|_, _| (401, json!({"error": "general_error"}).to_string()));
    let err = server.client().verify_session().expect_err("rejected");
    assert_eq!(err.kind(), ErrorKind::Permission);
    assert!(err.hint().unwrap_or_default().contains("FANBOXSESSID"));
}

#[test]
fn status_codes_surface_as_error_kinds() {
    let server = StubServer::start(|_, target| {
        if target.starts_with("/creator.get") {
            (404, json!({"error": "not_found"}).to_string())
        } else {
            (502, "bad gateway".to_string())
        }
    });
    let client = server.client();

    let err = client.creator_get("nobody").err().expect("not found");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().unwrap_or_default().contains("not_found"));

    let err = client.bell_count_unread().err().expect("bad gateway");
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn browsable_posts_walks_every_page() {
    let server = StubServer::start(|base, target| {
        if target.starts_with("/post.paginateCreator") {
            let pages = json!({
                "body": [
                    format!("{base}post.listCreator?creatorId=mika&maxId=3&limit=2"),
                    format!("{base}post.listCreator?creatorId=mika&maxId=1&limit=2"),
                ]
            });
            return (200, pages.to_string());
        }
        if target.contains("maxId=3") {
            let page = json!({"body": {
                "items": [
                    {"id": "3", "creatorId": "mika", "isRestricted": true, "feeRequired": 1000},
                    {"id": "2", "creatorId": "mika", "isRestricted": false}
                ],
                "nextUrl": format!("{base}post.listCreator?creatorId=mika&maxId=1&limit=2")
            }});
            return (200, page.to_string());
        }
        if target.contains("maxId=1") {
            let page = json!({"body": {
                "items": [{"id": "1", "creatorId": "mika", "isRestricted": false}],
                "nextUrl": null
            }});
            return (200, page.to_string());
        }
        (404, json!({"error": "not_found"}).to_string())
    });

    let posts = browsable_posts(&server.client(), "mika").expect("posts");
    let ids: Vec<&str> = posts.iter().map(|post| post.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);

    let targets: Vec<String> = server
        .requests()
        .iter()
        .filter_map(|head| head.split_whitespace().nth(1).map(str::to_string))
        .collect();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0], "/post.paginateCreator?creatorId=mika");
    assert_eq!(targets[1], "/post.listCreator?creatorId=mika&maxId=3&limit=2");
}
