use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    AppFeedback, CreateTagRequest, FeedbackRequest, NewUserTag, ProfileUpdate, SavePreferencesRequest,
    SaveRestaurantRequest, SavedListQuery, SavedStatusResponse, SuccessResponse, UpdateProfileRequest,
    UpdateRestaurantTagsRequest,
};
use crate::services::SupabaseError;
use super::{bearer_token, error_response, persistence_error, require_session, validation_error, AppState};

/// Configure profile, saved list, tag, feedback and auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profile", web::get().to(get_profile))
        .route("/profile", web::put().to(update_profile))
        .route("/profile/preferences", web::put().to(save_preferences))
        .route("/saved", web::get().to(list_saved))
        .route("/saved", web::post().to(save_restaurant))
        .route("/saved/{restaurant_id}", web::get().to(saved_status))
        .route("/saved/{restaurant_id}", web::delete().to(remove_saved))
        .route("/saved/{restaurant_id}/tags", web::get().to(get_restaurant_tags))
        .route("/saved/{restaurant_id}/tags", web::put().to(set_restaurant_tags))
        .route("/tags", web::get().to(list_tags))
        .route("/tags", web::post().to(create_tag))
        .route("/tags/{tag_id}", web::delete().to(delete_tag))
        .route("/feedback", web::post().to(submit_feedback))
        .route("/auth/signout", web::post().to(sign_out));
}

/// Profile of the caller, served from the session cache when fresh
async fn get_profile(state: web::Data<AppState>, http_req: HttpRequest) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    if let Some(profile) = state.sessions.cached_profile(&session.user_id).await {
        tracing::trace!("Profile cache hit: {}", session.user_id);
        return HttpResponse::Ok().json(profile);
    }

    match state.supabase.get_profile(&session.user_id).await {
        Ok(profile) => {
            state.sessions.store_profile(profile.clone()).await;
            HttpResponse::Ok().json(profile)
        }
        Err(e) => persistence_error(e, "Failed to load profile"),
    }
}

async fn update_profile(
    state: web::Data<AppState>,
    req: web::Json<UpdateProfileRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    let update = ProfileUpdate {
        username: req.username.map(|name| name.trim().to_string()),
        phone_number: req.phone_number,
        dietary_preferences: req.dietary_preferences,
        allergies: req.allergies,
    };

    write_profile(&state, &session.user_id, update, "Failed to update profile").await
}

/// Store the current search restrictions on the caller's profile
///
/// PUT /api/v1/profile/preferences
async fn save_preferences(
    state: web::Data<AppState>,
    req: web::Json<SavePreferencesRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let req = req.into_inner();
    let update = ProfileUpdate {
        dietary_preferences: Some(req.dietary_restrictions),
        allergies: Some(req.allergies),
        ..Default::default()
    };

    write_profile(&state, &session.user_id, update, "Failed to save preferences").await
}

async fn write_profile(state: &AppState, user_id: &str, update: ProfileUpdate, failure: &str) -> HttpResponse {
    if update.username.is_none()
        && update.phone_number.is_none()
        && update.dietary_preferences.is_none()
        && update.allergies.is_none()
    {
        return error_response(400, "Validation failed", "No profile fields to update");
    }

    match state.supabase.update_profile(user_id, &update).await {
        Ok(profile) => {
            tracing::info!("Updated profile for user {}", user_id);
            state.sessions.store_profile(profile.clone()).await;
            HttpResponse::Ok().json(profile)
        }
        Err(e) => {
            state.sessions.invalidate_profile(user_id).await;
            persistence_error(e, failure)
        }
    }
}

/// GET /api/v1/saved?tagId=
async fn list_saved(
    state: web::Data<AppState>,
    query: web::Query<SavedListQuery>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let tag_id = query.tag_id.as_deref().filter(|id| !id.is_empty());

    match state.supabase.list_saved(&session.user_id, tag_id).await {
        Ok(restaurants) => HttpResponse::Ok().json(restaurants),
        Err(e) => persistence_error(e, "Failed to load saved restaurants"),
    }
}

async fn save_restaurant(
    state: web::Data<AppState>,
    req: web::Json<SaveRestaurantRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let restaurant = &req.restaurant;

    match state.supabase.save_restaurant(&session.user_id, restaurant).await {
        // Already saved counts as success
        Ok(()) | Err(SupabaseError::Conflict(_)) => HttpResponse::Ok().json(SavedStatusResponse {
            restaurant_id: restaurant.id.clone(),
            saved: true,
        }),
        Err(e) => persistence_error(e, "Failed to update saved status"),
    }
}

async fn saved_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let restaurant_id = path.into_inner();

    match state.supabase.is_saved(&session.user_id, &restaurant_id).await {
        Ok(saved) => HttpResponse::Ok().json(SavedStatusResponse { restaurant_id, saved }),
        Err(e) => persistence_error(e, "Failed to check saved status"),
    }
}

async fn remove_saved(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let restaurant_id = path.into_inner();

    match state.supabase.remove_saved(&session.user_id, &restaurant_id).await {
        Ok(()) => HttpResponse::Ok().json(SavedStatusResponse {
            restaurant_id,
            saved: false,
        }),
        Err(e) => persistence_error(e, "Failed to update saved status"),
    }
}

async fn get_restaurant_tags(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state.supabase.restaurant_tags(&session.user_id, &path).await {
        Ok(tags) => {
            let tag_ids: Vec<String> = tags.into_iter().map(|t| t.tag_id).collect();
            HttpResponse::Ok().json(serde_json::json!({ "tagIds": tag_ids }))
        }
        Err(e) => persistence_error(e, "Failed to load restaurant tags"),
    }
}

async fn set_restaurant_tags(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateRestaurantTagsRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state
        .supabase
        .set_restaurant_tags(&session.user_id, &path, &req.tag_ids)
        .await
    {
        Ok(tag_ids) => HttpResponse::Ok().json(serde_json::json!({ "tagIds": tag_ids })),
        Err(e) => persistence_error(e, "Failed to update restaurant tags"),
    }
}

async fn list_tags(state: web::Data<AppState>, http_req: HttpRequest) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state.supabase.list_tags(&session.user_id).await {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(e) => persistence_error(e, "Failed to load tags"),
    }
}

async fn create_tag(
    state: web::Data<AppState>,
    req: web::Json<CreateTagRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let tag_name = req.tag_name.trim();
    if tag_name.is_empty() {
        return error_response(400, "Validation failed", "Please enter a tag name");
    }

    let tag = NewUserTag {
        user_id: session.user_id.clone(),
        tag_name: tag_name.to_string(),
        color: req.color.clone(),
    };

    match state.supabase.create_tag(&tag).await {
        Ok(created) => {
            tracing::info!("Created tag {:?} for user {}", created.tag_name, session.user_id);
            HttpResponse::Created().json(created)
        }
        Err(e @ SupabaseError::Conflict(_)) => {
            persistence_error(e, "A tag with this name already exists")
        }
        Err(e) => persistence_error(e, "Failed to create tag"),
    }
}

async fn delete_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> HttpResponse {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state.supabase.delete_tag(&session.user_id, &path).await {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse {
            success: true,
            message: "Tag deleted successfully".to_string(),
        }),
        Err(e) => persistence_error(e, "Failed to delete tag"),
    }
}

/// Submit app feedback
///
/// POST /api/v1/feedback
///
/// Authentication is optional; signed-in feedback carries the user id.
async fn submit_feedback(
    state: web::Data<AppState>,
    req: web::Json<FeedbackRequest>,
    http_req: HttpRequest,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let user_id = match bearer_token(&http_req) {
        Some(token) => match state.sessions.authenticate(Some(token)).await {
            Ok(session) => Some(session.user_id),
            Err(e) => {
                tracing::debug!("Submitting feedback anonymously: {}", e);
                None
            }
        },
        None => None,
    };

    let req = req.into_inner();
    let feedback = AppFeedback {
        user_id,
        feedback_type: req.feedback_type,
        subject: req.subject.trim().to_string(),
        message: req.message.trim().to_string(),
        rating: req.rating,
        user_email: req.user_email,
    };

    match state.supabase.submit_feedback(&feedback).await {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse {
            success: true,
            message: "Thank you! Your feedback has been submitted.".to_string(),
        }),
        Err(e) => persistence_error(e, "Failed to submit feedback"),
    }
}

async fn sign_out(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let session = match require_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    state.sessions.sign_out(&session).await;
    tracing::info!("User {} signed out", session.user_id);

    HttpResponse::Ok().json(SuccessResponse {
        success: true,
        message: "Signed out".to_string(),
    })
}
