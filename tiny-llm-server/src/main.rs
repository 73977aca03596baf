use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};

use serde::{Deserialize, Serialize};
use tiny_llm_core::io::{list_files, read_named_corpus};
use tiny_llm_core::{
	BASE_CORPUS, DEFAULT_MAX_TOKENS, DEFAULT_PROMPT, DEFAULT_TEMPERATURE, GenerationOptions, RANK_LIMIT, TinyLlmError,
	TinyLlmModel, build_model, display_token, generate_text, merge_corpus, rank_next_tokens,
};

mod config;

use config::ServerConfig;

const CORPUS_EXTENSION: &str = "txt";

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	prompt: Option<String>,
	max_tokens: Option<usize>,
	temperature: Option<f64>,
	seed: Option<String> // -> integer, or blank / "none" for a random run
}

/// Query parameters for the `/v1/rank` endpoint
#[derive(Deserialize)]
struct RankParams {
	prompt: Option<String>,
	limit: Option<usize>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>
}

/// A ranked candidate as sent to clients.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct RankedToken {
	token: String,
	display: String,
	probability: f64,
}

#[derive(Serialize, Deserialize, Debug)]
struct ModelInfo {
	vocabulary_size: usize,
	corpus_tokens: usize,
	vocabulary: Vec<String>,
}

/// State shared by all workers.
///
/// The active model is swapped as a whole; handlers clone the `Arc` and
/// release the lock before doing any work, so a swap never affects a
/// request already in flight.
struct SharedData {
	model: RwLock<Arc<TinyLlmModel>>,
	/// Serializes model replacements (training and reset).
	training: Mutex<()>,
	data_folder: PathBuf,
}

impl SharedData {
	fn new(data_folder: PathBuf) -> Self {
		Self {
			model: RwLock::new(Arc::new(build_model(BASE_CORPUS))),
			training: Mutex::new(()),
			data_folder,
		}
	}

	/// Snapshot of the active model.
	fn model(&self) -> Result<Arc<TinyLlmModel>, HttpResponse> {
		match self.model.read() {
			Ok(model) => Ok(Arc::clone(&model)),
			Err(_) => Err(HttpResponse::InternalServerError().body("Model lock failed")),
		}
	}

	/// Replaces the active model.
	fn swap(&self, model: TinyLlmModel) -> Result<(), HttpResponse> {
		match self.model.write() {
			Ok(mut active) => {
				*active = Arc::new(model);
				Ok(())
			}
			Err(_) => Err(HttpResponse::InternalServerError().body("Model lock failed")),
		}
	}

	/// Builds a replacement from the current model and swaps it in.
	///
	/// Holds the `training` lock from snapshot to swap, so every replacement
	/// (merge or reset) starts from the result of the previous one.
	fn replace_with<F>(&self, rebuild: F) -> Result<Arc<TinyLlmModel>, HttpResponse>
	where
		F: FnOnce(&TinyLlmModel) -> TinyLlmModel,
	{
		let _guard = self
			.training
			.lock()
			.map_err(|_| HttpResponse::InternalServerError().body("Training lock failed"))?;
		let current = self.model()?;
		self.swap(rebuild(&current))?;
		self.model()
	}

	/// Merges `text` into the active model and swaps it in.
	fn train(&self, text: &str) -> Result<Arc<TinyLlmModel>, HttpResponse> {
		self.replace_with(|current| merge_corpus(current.corpus(), text))
	}

	/// Rebuilds the model from the built-in corpus.
	fn reset(&self) -> Result<Arc<TinyLlmModel>, HttpResponse> {
		self.replace_with(|_| build_model(BASE_CORPUS))
	}
}

impl GenerateParams {
	/// Parses the optional seed.
	fn seed(&self) -> Result<Option<u64>, String> {
		match self.seed.as_deref().map(str::trim) {
			None | Some("") => Ok(None),
			Some(s) if s.eq_ignore_ascii_case("none") => Ok(None),
			Some(s) => match s.parse::<u64>() {
				Ok(seed) => Ok(Some(seed)),
				Err(_) => Err("Seed must be a non-negative integer or 'none'".into()),
			},
		}
	}

	fn options(&self) -> Result<GenerationOptions, String> {
		Ok(GenerationOptions::new(
			self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
			self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
			self.seed()?,
		))
	}
}

/// Maps a core error to a response: caller mistakes are 400, the rest 500.
fn error_response(error: TinyLlmError) -> HttpResponse {
	if error.is_usage_error() {
		HttpResponse::BadRequest().body(error.to_string())
	} else {
		log::error!("{error}");
		HttpResponse::InternalServerError().body(error.to_string())
	}
}

fn model_info(model: &TinyLlmModel) -> ModelInfo {
	ModelInfo {
		vocabulary_size: model.vocabulary_size(),
		corpus_tokens: model.token_count(),
		vocabulary: model.vocabulary().iter().map(|&token| display_token(token)).collect(),
	}
}

/// HTTP GET endpoint `/v1/model`
///
/// Returns the size of the active model.
#[get("/v1/model")]
async fn get_model(data: web::Data<SharedData>) -> impl Responder {
	match data.model() {
		Ok(model) => HttpResponse::Ok().json(model_info(&model)),
		Err(response) => response,
	}
}

/// HTTP GET endpoint `/v1/rank`
///
/// Returns the most probable next tokens after the prompt.
#[get("/v1/rank")]
async fn get_rank(data: web::Data<SharedData>, query: web::Query<RankParams>) -> impl Responder {
	let model = match data.model() {
		Ok(model) => model,
		Err(response) => return response,
	};
	let prompt = query.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
	let limit = query.limit.unwrap_or(RANK_LIMIT);

	let ranked: Vec<RankedToken> = rank_next_tokens(&model, prompt, limit)
		.into_iter()
		.map(|candidate| RankedToken {
			token: candidate.token.to_string(),
			display: candidate.display(),
			probability: candidate.probability,
		})
		.collect();

	HttpResponse::Ok().json(ranked)
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates text from the prompt with the given sampling parameters.
/// Returns the generated text (without the prompt) as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let options = match query.options() {
		Ok(options) => options,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	let model = match data.model() {
		Ok(model) => model,
		Err(response) => return response,
	};
	let prompt = query.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);

	match generate_text(&model, prompt, &options) {
		Ok(text) => {
			log::info!(
				"generated {} tokens {}",
				options.max_tokens,
				options.seed.map_or("with random seed".to_owned(), |seed| format!("using seed {seed}"))
			);
			HttpResponse::Ok().body(text)
		}
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Merges the request body into the training corpus.
#[put("/v1/train")]
async fn put_train(data: web::Data<SharedData>, body: String) -> impl Responder {
	if body.trim().is_empty() {
		return HttpResponse::BadRequest().body("Add some custom training text before retraining");
	}

	match data.train(&body) {
		Ok(model) => HttpResponse::Ok().json(model_info(&model)),
		Err(response) => response,
	}
}

/// HTTP PUT endpoint `/v1/reset`
///
/// Rebuilds the model from the built-in corpus.
#[put("/v1/reset")]
async fn put_reset(data: web::Data<SharedData>) -> impl Responder {
	match data.reset() {
		Ok(model) => HttpResponse::Ok().json(model_info(&model)),
		Err(response) => response,
	}
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists training files available in the data folder.
#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match list_files(&data.data_folder, CORPUS_EXTENSION) {
		Ok(files) => {
			let names: Vec<String> = files
				.iter()
				.filter_map(|file| Path::new(file).file_stem())
				.map(|stem| stem.to_string_lossy().to_string())
				.collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

/// HTTP PUT endpoint `/v1/train_files`
///
/// Merges the named data-folder files into the model, in the given order.
#[put("/v1/train_files")]
async fn put_train_files(data: web::Data<SharedData>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let mut text = String::new();
	for name in query_names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
		match read_named_corpus(&data.data_folder, name, CORPUS_EXTENSION) {
			Ok(contents) => text.push_str(&contents),
			Err(e) => return error_response(e),
		}
	}

	match data.train(&text) {
		Ok(model) => HttpResponse::Ok().json(model_info(&model)),
		Err(response) => response,
	}
}

/// Main entry point for the server.
///
/// Builds the base model, shares it between workers and starts an
/// Actix-web HTTP server. Settings come from `ServerConfig::from_env`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env();
	let shared_data = web::Data::new(SharedData::new(config.data_folder.clone()));
	log::info!("listening on {}:{} (data folder: {})", config.host, config.port, config.data_folder.display());

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_model)
			.service(get_rank)
			.service(get_generated)
			.service(put_train)
			.service(put_reset)
			.service(get_corpora)
			.service(put_train_files)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test as actix_test;

	fn shared() -> web::Data<SharedData> {
		web::Data::new(SharedData::new(PathBuf::from("./data")))
	}

	fn params(seed: Option<&str>) -> GenerateParams {
		GenerateParams { prompt: None, max_tokens: None, temperature: None, seed: seed.map(str::to_owned) }
	}

	#[test]
	fn parses_seed() {
		assert_eq!(params(None).seed(), Ok(None));
		assert_eq!(params(Some(" ")).seed(), Ok(None));
		assert_eq!(params(Some("None")).seed(), Ok(None));
		assert_eq!(params(Some("42")).seed(), Ok(Some(42)));
		assert!(params(Some("-3")).seed().is_err());
		assert!(params(Some("abc")).seed().is_err());
	}

	#[actix_web::test]
	async fn rank_returns_json_candidates() {
		let app = actix_test::init_service(App::new().app_data(shared()).service(get_rank)).await;
		let req = actix_test::TestRequest::get().uri("/v1/rank?prompt=a&limit=3").to_request();
		let ranked: Vec<RankedToken> = actix_test::call_and_read_body_json(&app, req).await;

		assert!(!ranked.is_empty() && ranked.len() <= 3);
		assert!(ranked.windows(2).all(|w| w[0].probability >= w[1].probability));
	}

	#[actix_web::test]
	async fn seeded_generation_is_stable() {
		let app = actix_test::init_service(App::new().app_data(shared()).service(get_generated)).await;
		let uri = "/v1/generate?prompt=the%20&max_tokens=40&temperature=0.7&seed=9";

		let first = actix_test::call_and_read_body(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
		let second = actix_test::call_and_read_body(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
		assert_eq!(first, second);
		assert_eq!(std::str::from_utf8(&first).unwrap().chars().count(), 40);
	}

	#[actix_web::test]
	async fn invalid_temperature_is_bad_request() {
		let app = actix_test::init_service(App::new().app_data(shared()).service(get_generated)).await;
		let req = actix_test::TestRequest::get().uri("/v1/generate?temperature=0").to_request();
		let resp = actix_test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn training_swaps_model() {
		let data = shared();
		let before = data.model().unwrap();
		let app = actix_test::init_service(App::new().app_data(data.clone()).service(put_train).service(put_reset)).await;

		let req = actix_test::TestRequest::put().uri("/v1/train").set_payload("zebra quiz").to_request();
		let info: ModelInfo = actix_test::call_and_read_body_json(&app, req).await;
		assert_eq!(info.corpus_tokens, before.token_count() + "zebra quiz".len());

		// Snapshot taken before the swap is unchanged
		assert_eq!(*before, build_model(BASE_CORPUS));

		let req = actix_test::TestRequest::put().uri("/v1/train").set_payload("   ").to_request();
		assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = actix_test::TestRequest::put().uri("/v1/reset").to_request();
		let info: ModelInfo = actix_test::call_and_read_body_json(&app, req).await;
		assert_eq!(info.corpus_tokens, before.token_count());
	}

	#[test]
	fn reset_is_never_lost_behind_training() {
		let extra = "the owl hooted. ".repeat(20_000);
		let trained = format!("{BASE_CORPUS}{extra}");

		for _ in 0..5 {
			let data = SharedData::new(PathBuf::from("./data"));
			assert!(data.train("xyz").is_ok());

			std::thread::scope(|scope| {
				let training = scope.spawn(|| data.train(&extra).is_ok());
				let reset = scope.spawn(|| data.reset().is_ok());
				assert!(training.join().unwrap());
				assert!(reset.join().unwrap());
			});

			// Either reset ran last, or training merged onto the reset model
			let corpus = data.model().unwrap().corpus_text();
			assert!(corpus == BASE_CORPUS || corpus == trained, "reset was overwritten by training");
		}
	}

	/// Fresh data folder holding `files`, unique per test.
	fn data_folder(test: &str, files: &[(&str, &str)]) -> PathBuf {
		let folder = std::env::temp_dir().join(format!("tiny-llm-server-{test}-{}", std::process::id()));
		let _ = std::fs::remove_dir_all(&folder);
		std::fs::create_dir_all(&folder).unwrap();
		for (name, contents) in files {
			std::fs::write(folder.join(name), contents).unwrap();
		}
		folder
	}

	#[actix_web::test]
	async fn corpora_lists_file_stems() {
		let folder = data_folder("corpora", &[("fables.txt", "a"), ("a.txt.notes.txt", "b"), ("readme.md", "c")]);
		let data = web::Data::new(SharedData::new(folder.clone()));
		let app = actix_test::init_service(App::new().app_data(data).service(get_corpora)).await;

		let req = actix_test::TestRequest::get().uri("/v1/corpora").to_request();
		let body = actix_test::call_and_read_body(&app, req).await;
		assert_eq!(std::str::from_utf8(&body).unwrap(), "a.txt.notes\nfables");

		std::fs::remove_dir_all(&folder).unwrap();
	}

	#[actix_web::test]
	async fn train_files_merges_in_given_order() {
		let folder = data_folder("train-files", &[("alpha.txt", "alpha "), ("beta.txt", "beta ")]);
		let data = web::Data::new(SharedData::new(folder.clone()));
		let app = actix_test::init_service(App::new().app_data(data.clone()).service(put_train_files)).await;

		let req = actix_test::TestRequest::put().uri("/v1/train_files?names=beta,%20alpha").to_request();
		let info: ModelInfo = actix_test::call_and_read_body_json(&app, req).await;
		assert_eq!(info.corpus_tokens, BASE_CORPUS.len() + "beta alpha ".len());
		assert_eq!(data.model().unwrap().corpus_text(), format!("{BASE_CORPUS}beta alpha "));

		std::fs::remove_dir_all(&folder).unwrap();
	}

	#[actix_web::test]
	async fn train_files_rejects_bad_names() {
		let folder = data_folder("train-files-bad", &[("alpha.txt", "alpha ")]);
		let data = web::Data::new(SharedData::new(folder.clone()));
		let app = actix_test::init_service(App::new().app_data(data.clone()).service(put_train_files)).await;

		for (uri, status) in [
			("/v1/train_files", StatusCode::BAD_REQUEST),
			("/v1/train_files?names=%20", StatusCode::BAD_REQUEST),
			("/v1/train_files?names=..%2Fsecret", StatusCode::BAD_REQUEST),
			("/v1/train_files?names=missing", StatusCode::INTERNAL_SERVER_ERROR),
		] {
			let req = actix_test::TestRequest::put().uri(uri).to_request();
			assert_eq!(actix_test::call_service(&app, req).await.status(), status, "{uri}");
		}

		// Nothing was merged
		assert_eq!(data.model().unwrap().corpus_text(), BASE_CORPUS);

		std::fs::remove_dir_all(&folder).unwrap();
	}
}
