//! Pipeline scenarios exercising the chatbot end to end with stub backends.
