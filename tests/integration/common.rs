//! In-process fake of the SeaweedFS IAM and S3 endpoints.
//!
//! [`FakeSeaweed`] mounts a single stateful responder on a wiremock server.
//! It understands the IAM query actions and the bucket/tagging S3 calls the
//! client issues, keeps users, keys, policies and buckets in memory, and
//! answers with the same XML envelopes and error codes as SeaweedFS.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use seaweedfs_provider::types::{Tagging, Tags};
use seaweedfs_provider::{Client, Credentials, Provider, RetryConfig, UserLockRegistry};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ACCESS_KEY: &str = "admin";
pub const SECRET_KEY: &str = "admin-secret";

#[derive(Debug, Clone)]
pub struct StoredKey {
    pub access_key_id: String,
    pub status: String,
}

#[derive(Debug, Clone)]
struct Injected {
    remaining: u32,
    status: u16,
    code: String,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<String, String>,
    keys: BTreeMap<String, Vec<StoredKey>>,
    policies: BTreeMap<(String, String), String>,
    buckets: BTreeMap<String, Option<Tags>>,
    next_key: u32,
    failures: HashMap<String, Injected>,
    calls: Vec<String>,
    unsigned: u32,
    last_tagging_body: Option<String>,
}

/// Handle to the fake; clones share state.
#[derive(Clone)]
pub struct FakeSeaweed {
    server: Arc<MockServer>,
    state: Arc<Mutex<State>>,
}

impl FakeSeaweed {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(State::default()));

        Mock::given(any())
            .respond_with(FakeResponder {
                state: Arc::clone(&state),
            })
            .mount(&server)
            .await;

        Self {
            server: Arc::new(server),
            state,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn client(&self) -> Client {
        Client::builder()
            .endpoint(self.uri())
            .credentials(Credentials::new(ACCESS_KEY, SECRET_KEY))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    /// Provider with a fast retry policy of `attempts` tries.
    pub fn provider(&self, attempts: u32) -> Provider {
        let retry = RetryConfig::new()
            .with_max_attempts(attempts)
            .with_initial_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(20));
        Provider::new(self.client(), Arc::new(UserLockRegistry::new()), retry)
    }

    /// Fails the next `times` calls of `action` with `status` and `code`.
    pub fn fail(&self, action: &str, times: u32, status: u16, code: &str) {
        self.state.lock().failures.insert(
            action.to_owned(),
            Injected {
                remaining: times,
                status,
                code: code.to_owned(),
            },
        );
    }

    /// Number of calls made to `action`, including failed ones.
    pub fn calls(&self, action: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == action).count()
    }

    pub fn unsigned_requests(&self) -> u32 {
        self.state.lock().unsigned
    }

    pub fn last_tagging_body(&self) -> Option<String> {
        self.state.lock().last_tagging_body.clone()
    }

    pub fn has_user(&self, name: &str) -> bool {
        self.state.lock().users.contains_key(name)
    }

    pub fn keys_of(&self, user: &str) -> Vec<StoredKey> {
        self.state.lock().keys.get(user).cloned().unwrap_or_default()
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.state.lock().buckets.contains_key(bucket)
    }

    pub fn stored_policy(&self, user: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .policies
            .get(&(user.to_owned(), name.to_owned()))
            .cloned()
    }

    /// Changes state behind the provider's back.
    pub fn seed_user(&self, name: &str) {
        self.state.lock().users.insert(name.to_owned(), String::new());
    }

    pub fn seed_bucket(&self, bucket: &str) {
        self.state.lock().buckets.insert(bucket.to_owned(), None);
    }

    pub fn seed_policy(&self, user: &str, name: &str, document: &str) {
        self.state
            .lock()
            .policies
            .insert((user.to_owned(), name.to_owned()), document.to_owned());
    }

    pub fn remove_user(&self, name: &str) {
        let mut state = self.state.lock();
        state.users.remove(name);
        state.keys.remove(name);
    }

    pub fn remove_bucket(&self, bucket: &str) {
        self.state.lock().buckets.remove(bucket);
    }
}

struct FakeResponder {
    state: Arc<Mutex<State>>,
}

impl Respond for FakeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock();

        let signed = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| {
                v.starts_with(&format!("AWS4-HMAC-SHA256 Credential={}/", ACCESS_KEY))
            });
        if !signed {
            state.unsigned += 1;
            return s3_error(403, "AccessDenied", "missing signature");
        }

        if request.url.path() == "/" && request.method.as_str() == "POST" {
            let form: HashMap<String, String> =
                url::form_urlencoded::parse(&request.body).into_owned().collect();
            let action = form.get("Action").cloned().unwrap_or_default();
            return handle_iam(&mut state, &action, &form);
        }

        let bucket = request.url.path().trim_start_matches('/').to_owned();
        let tagging = request.url.query() == Some("tagging");
        let method = request.method.as_str();
        let action = match (method, tagging) {
            ("PUT", false) => "CreateBucket",
            ("HEAD", _) => "HeadBucket",
            ("DELETE", false) => "DeleteBucket",
            ("GET", true) => "GetBucketTagging",
            ("PUT", true) => "PutBucketTagging",
            ("DELETE", true) => "DeleteBucketTagging",
            _ => return s3_error(405, "MethodNotAllowed", "unsupported request"),
        };
        handle_s3(&mut state, action, &bucket, request)
    }
}

fn injected(state: &mut State, action: &str) -> Option<(u16, String)> {
    let failure = state.failures.get_mut(action)?;
    if failure.remaining == 0 {
        return None;
    }
    failure.remaining -= 1;
    Some((failure.status, failure.code.clone()))
}

fn handle_iam(state: &mut State, action: &str, form: &HashMap<String, String>) -> ResponseTemplate {
    state.calls.push(action.to_owned());
    if let Some((status, code)) = injected(state, action) {
        return iam_error(status, &code, "injected failure");
    }

    let user = form.get("UserName").cloned().unwrap_or_default();
    let known_user = state.users.contains_key(&user);
    let no_such_user = || iam_error(404, "NoSuchEntity", &format!("user {} not found", user));

    match action {
        "CreateUser" => {
            if known_user {
                return iam_error(409, "EntityAlreadyExists", "user already exists");
            }
            let path = form.get("Path").cloned().unwrap_or_default();
            state.users.insert(user.clone(), path.clone());
            iam_ok(
                action,
                &format!(
                    "<User><UserName>{u}</UserName><Arn>arn:aws:iam:::user/{u}</Arn>\
                     <UserId>{u}</UserId><Path>{p}</Path></User>",
                    u = user,
                    p = path
                ),
            )
        },
        "GetUser" => match state.users.get(&user) {
            Some(path) => iam_ok(
                action,
                &format!(
                    "<User><UserName>{u}</UserName><Arn>arn:aws:iam:::user/{u}</Arn>\
                     <UserId>{u}</UserId><Path>{p}</Path></User>",
                    u = user,
                    p = path
                ),
            ),
            None => no_such_user(),
        },
        "DeleteUser" => {
            if state.users.remove(&user).is_none() {
                return no_such_user();
            }
            state.keys.remove(&user);
            state.policies.retain(|(owner, _), _| *owner != user);
            iam_ok(action, "")
        },
        "CreateAccessKey" => {
            if !known_user {
                return no_such_user();
            }
            state.next_key += 1;
            let id = format!("AKID{:04}", state.next_key);
            let secret = format!("SECRET{:04}", state.next_key);
            state.keys.entry(user.clone()).or_default().push(StoredKey {
                access_key_id: id.clone(),
                status: "Active".to_owned(),
            });
            iam_ok(
                action,
                &format!(
                    "<AccessKey><UserName>{}</UserName><AccessKeyId>{}</AccessKeyId>\
                     <Status>Active</Status><SecretAccessKey>{}</SecretAccessKey></AccessKey>",
                    user, id, secret
                ),
            )
        },
        "ListAccessKeys" => {
            if !known_user {
                return no_such_user();
            }
            let members: String = state
                .keys
                .get(&user)
                .map(|keys| {
                    keys.iter()
                        .map(|k| {
                            format!(
                                "<member><UserName>{}</UserName><AccessKeyId>{}</AccessKeyId>\
                                 <Status>{}</Status></member>",
                                user, k.access_key_id, k.status
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            iam_ok(
                action,
                &format!("<AccessKeyMetadata>{}</AccessKeyMetadata>", members),
            )
        },
        "DeleteAccessKey" => {
            let id = form.get("AccessKeyId").cloned().unwrap_or_default();
            let Some(keys) = state.keys.get_mut(&user) else {
                return no_such_user();
            };
            let before = keys.len();
            keys.retain(|k| k.access_key_id != id);
            if keys.len() == before {
                return iam_error(404, "NoSuchEntity", "access key not found");
            }
            iam_ok(action, "")
        },
        "PutUserPolicy" => {
            if !known_user {
                return no_such_user();
            }
            let name = form.get("PolicyName").cloned().unwrap_or_default();
            let document = form.get("PolicyDocument").cloned().unwrap_or_default();
            state.policies.insert((user, name), document);
            iam_ok(action, "")
        },
        "GetUserPolicy" => {
            let name = form.get("PolicyName").cloned().unwrap_or_default();
            match state.policies.get(&(user.clone(), name.clone())) {
                Some(document) => iam_ok(
                    action,
                    &format!(
                        "<UserName>{}</UserName><PolicyName>{}</PolicyName>\
                         <PolicyDocument>{}</PolicyDocument>",
                        user,
                        name,
                        urlencoding::encode(document)
                    ),
                ),
                None => iam_error(404, "NoSuchEntity", "policy not found"),
            }
        },
        "DeleteUserPolicy" => {
            let name = form.get("PolicyName").cloned().unwrap_or_default();
            match state.policies.remove(&(user, name)) {
                Some(_) => iam_ok(action, ""),
                None => iam_error(404, "NoSuchEntity", "policy not found"),
            }
        },
        _ => iam_error(400, "InvalidAction", "unknown action"),
    }
}

fn handle_s3(state: &mut State, action: &str, bucket: &str, request: &Request) -> ResponseTemplate {
    state.calls.push(action.to_owned());
    if let Some((status, code)) = injected(state, action) {
        return s3_error(status, &code, "injected failure");
    }

    let exists = state.buckets.contains_key(bucket);
    let no_such_bucket = || s3_error(404, "NoSuchBucket", "The specified bucket does not exist");

    match action {
        "CreateBucket" => {
            if exists {
                return s3_error(409, "BucketAlreadyOwnedByYou", "bucket already exists");
            }
            state.buckets.insert(bucket.to_owned(), None);
            ResponseTemplate::new(200)
        },
        // HEAD responses carry no body.
        "HeadBucket" if exists => ResponseTemplate::new(200),
        "HeadBucket" => ResponseTemplate::new(404),
        "DeleteBucket" => {
            if state.buckets.remove(bucket).is_none() {
                return no_such_bucket();
            }
            ResponseTemplate::new(204)
        },
        "GetBucketTagging" => match state.buckets.get(bucket) {
            None => no_such_bucket(),
            Some(None) => s3_error(404, "NoSuchTagSet", "The TagSet does not exist"),
            Some(Some(tags)) => {
                let body = quick_xml::se::to_string(&Tagging::from_tags(tags)).unwrap();
                xml_response(200, body)
            },
        },
        "PutBucketTagging" => {
            if !exists {
                return no_such_bucket();
            }
            if request.headers.get("content-md5").is_none() {
                return s3_error(400, "InvalidRequest", "Content-MD5 is required");
            }
            let body = String::from_utf8_lossy(&request.body).into_owned();
            let tagging: Tagging = match quick_xml::de::from_str(&body) {
                Ok(tagging) => tagging,
                Err(_) => return s3_error(400, "MalformedXML", "bad tagging document"),
            };
            state.last_tagging_body = Some(body);
            state
                .buckets
                .insert(bucket.to_owned(), Some(tagging.into_tags()));
            ResponseTemplate::new(200)
        },
        "DeleteBucketTagging" => {
            if !exists {
                return no_such_bucket();
            }
            state.buckets.insert(bucket.to_owned(), None);
            ResponseTemplate::new(204)
        },
        _ => s3_error(405, "MethodNotAllowed", "unsupported request"),
    }
}

fn xml_response(status: u16, body: String) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("content-type", "text/xml")
        .set_body_string(body)
}

fn iam_ok(action: &str, result: &str) -> ResponseTemplate {
    xml_response(
        200,
        format!(
            "<{a}Response><{a}Result>{r}</{a}Result>\
             <ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata></{a}Response>",
            a = action,
            r = result
        ),
    )
}

pub fn iam_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    xml_response(
        status,
        format!(
            "<ErrorResponse><Error><Type>Sender</Type><Code>{}</Code><Message>{}</Message></Error>\
             <RequestId>req-1</RequestId></ErrorResponse>",
            code, message
        ),
    )
}

pub fn s3_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    xml_response(
        status,
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>{}</Code><Message>{}</Message><Resource>/</Resource></Error>",
            code, message
        ),
    )
}

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}
