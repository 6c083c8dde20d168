use std::fmt::{self, Debug, Display};

use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError};
use actix_web::body::BoxBody;
use serde::Serialize;

pub const STATUS_OK: i32 = 0;
pub const STATUS_ERR_COMMON_FAIL: i32 = 1;
pub const STATUS_ERR_SYSTEMERROR: i32 = 500;

// 业务参数缺少
pub const STATUS_ERR_PARA_MISS: i32 = 201;
// 业务参数无效(格式或内容)或不存在
pub const STATUS_ERR_INVALID: i32 = 202;

pub const MESSAGE_SUCCESS: &str = "Operação realizada com sucesso";
pub const MESSAGE_COMMON_FAIL: &str = "Falha na operação";

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

#[derive(Serialize)]
pub struct ReturnData<T>
    where T: serde::Serialize,
{
    pub status: i32,
    pub message: String,
    pub result: T,
}

impl<T: Serialize> Responder for ReturnData<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        match serde_json::to_string(&self) {
            Ok(body) => HttpResponse::Ok().content_type(CONTENT_TYPE_JSON).body(body),
            Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        }
    }
}

//--------------------------------
/**
接口返回,无论操作成功和失败，http status code都为200，
通过 ReturnData.status !=0 来判断接口是否成功执行。
*/
pub type ReturnDataError = ReturnData<String>;

impl ReturnDataError {
    pub fn new(e: &str) -> Self {
        ReturnDataError {
            status: STATUS_ERR_COMMON_FAIL,
            message: MESSAGE_COMMON_FAIL.to_string(),
            result: e.to_string(),
        }
    }

    pub fn invalid(e: &str) -> Self {
        ReturnDataError {
            status: STATUS_ERR_INVALID,
            message: MESSAGE_COMMON_FAIL.to_string(),
            result: e.to_string(),
        }
    }
}

impl From<actix_web::Error> for ReturnDataError {
    fn from(e: actix_web::Error) -> Self {
        ReturnDataError::new(&e.to_string())
    }
}

impl Display for ReturnDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"{{"status":{},"message":"{}","result":"{}"}}"#, self.status, self.message, self.result)
    }
}

impl Debug for ReturnDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"{{"status":{},"message":"{}","result":"{}"}}"#, self.status, self.message, self.result)
    }
}

impl ResponseError for ReturnDataError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match serde_json::to_string(&self) {
            Ok(body) => HttpResponse::Ok().content_type(CONTENT_TYPE_JSON).body(body),
            Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        }
    }
}

impl From<String> for ReturnDataError {
    fn from(e: String) -> Self {
        ReturnDataError::new(&e)
    }
}

pub type ReturnDataType<T> = std::result::Result<ReturnData<T>, ReturnDataError>;


pub fn success<T: Serialize>(result: T) -> ReturnDataType<T> {
    Ok(ReturnData {
        status: STATUS_OK,
        message: MESSAGE_SUCCESS.to_string(),
        result,
    })
}

pub fn success_str(result: &str) -> ReturnDataType<String> {
    Ok(ReturnData {
        status: STATUS_OK,
        message: MESSAGE_SUCCESS.to_string(),
        result: result.to_string(),
    })
}

pub fn fail<T: Serialize>(result: &str) -> ReturnDataType<T> {
    Err(ReturnDataError::new(result))
}

pub fn fail_msg<T: Serialize>(msg: &str, result: &str) -> ReturnDataType<T> {
    Err(ReturnDataError {
        status: STATUS_ERR_COMMON_FAIL,
        message: msg.to_string(),
        result: result.to_string(),
    })
}
